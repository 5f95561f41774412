//! Queryable interface metadata for natively compiled libraries.
//!
//! A hosting library registers its module (and, optionally, a resident table
//! of compiled wrapper addresses) with a [`DatabaseHandle`]. The first full
//! query loads and merges every registered module's artifact into one
//! read-only [`Database`], which is then walked through typed handles:
//! names resolve to types and functions, types lead to methods and elements,
//! and functions lead to the wrappers a foreign runtime actually calls.

pub mod artifact;
pub mod db;
pub mod dump;
pub mod error;
pub mod handle;
pub mod unique_name;

pub use artifact::ArtifactBuilder;
pub use db::{CastPath, CastStep, Database, LoadedModule, Unwrapped};
pub use error::{CastError, LoadError};
pub use handle::{DatabaseHandle, LoadState};
pub use unique_name::wrapper_unique_name;

pub use idb_config::{LoaderConfig, SearchConfig};
pub use idb_ffi::{ModuleProvider, inventory};
pub use idb_index::{
    ElementIndex, FunctionIndex, MakeSeqIndex, ManifestIndex, ResidentModule, ResidentWrapper,
    TypeIndex, WrapperFn, WrapperIndex,
};
pub use idb_ty as model;
