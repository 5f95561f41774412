use std::path::PathBuf;

use idb_index::{ResidentError, TypeIndex, WrapperIndex};

/// Why (part of) the database could not be loaded. These never escape the
/// query API: the loader logs them and raises the error flag.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("database file `{file}` not found in {searched:?}")]
    NotFound { file: String, searched: Vec<PathBuf> },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{module}: unsupported format version {found}")]
    IncompatibleFormat { module: String, found: u32 },

    #[error("{module}: artifact lists {artifact} wrappers but the library links {resident}")]
    WrapperCountMismatch {
        module: String,
        artifact: usize,
        resident: usize,
    },

    #[error("{module}: {wrapper} is `{artifact}` in the artifact but `{resident}` in the library")]
    WrapperNameMismatch {
        module: String,
        wrapper: WrapperIndex,
        artifact: String,
        resident: String,
    },

    #[error("{module}: {kind} handle {raw} is out of range")]
    DanglingIndex {
        module: String,
        kind: &'static str,
        raw: u32,
    },

    #[error(transparent)]
    DuplicateUniqueName(#[from] ResidentError),

    #[error("{wrapper}: the receiver parameter must come first and only once")]
    MisplacedReceiver { wrapper: WrapperIndex },

    #[error("{ty}: wrapped type chain does not terminate")]
    WrappedCycle { ty: TypeIndex },

    #[error("{ty}: inherits a destructor that is not virtual")]
    InheritedDestructorNotVirtual { ty: TypeIndex },
}

/// Why a pointer conversion between two types was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CastError {
    #[error("{0} is not a known type")]
    UnknownType(TypeIndex),

    #[error("{derived} does not derive from {base}")]
    NotDerived { derived: TypeIndex, base: TypeIndex },

    #[error("cannot downcast from {base} to {derived}")]
    DowncastImpossible { derived: TypeIndex, base: TypeIndex },
}
