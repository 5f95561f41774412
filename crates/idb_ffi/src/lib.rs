//! Resident module sources.
//!
//! A hosting library contributes its resident wrapper table either by being
//! linked into the binary (`inventory` submissions) or by being loaded at
//! runtime and exporting `interrogate_module_def`.

pub mod dynamic_loader;
pub mod exports;
pub mod providers;

pub use dynamic_loader::{DynamicLibrary, DynamicLibraryLoader};
pub use exports::{
    MODULE_DEF_SYMBOL, ModuleDefFn, StableModuleDef, StableResidentWrapper, read_module_def,
};
pub use providers::{ModuleProvider, submitted_modules};

pub use inventory;
