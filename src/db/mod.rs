//! The merged, read-only interface database.

mod cast;
mod elements;
mod functions;
mod make_seqs;
mod manifests;
mod merge;
mod types;
mod validate;
mod wrappers;

use std::path::PathBuf;

use ahash::AHashMap;
use idb_index::{
    ElementIndex, FunctionIndex, Handle, MakeSeqIndex, ManifestIndex, TypeIndex, WrapperIndex,
};
use idb_ty::{
    ElementRecord, FunctionRecord, MakeSeqRecord, ManifestRecord, TypeRecord, WrapperRecord,
};

pub use cast::{CastPath, CastStep, Unwrapped};
pub(crate) use merge::ModuleSource;

/// An artifact that was merged into the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    pub library_name: String,
    pub module_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
struct NameIndex {
    manifests: AHashMap<String, ManifestIndex>,
    elements: AHashMap<String, ElementIndex>,
    elements_scoped: AHashMap<String, ElementIndex>,
    types: AHashMap<String, TypeIndex>,
    types_scoped: AHashMap<String, TypeIndex>,
    types_true: AHashMap<String, TypeIndex>,
    /// Overloads share a name, so functions map to every handle.
    functions: AHashMap<String, Vec<FunctionIndex>>,
    functions_scoped: AHashMap<String, Vec<FunctionIndex>>,
    wrappers: AHashMap<String, WrapperIndex>,
}

/// Every record of every loaded module, addressed by handle.
///
/// Tables only grow while loading; once a `Database` is handed out it is
/// never modified again.
#[derive(Debug, Default)]
pub struct Database {
    manifests: Vec<ManifestRecord>,
    elements: Vec<ElementRecord>,
    types: Vec<TypeRecord>,
    functions: Vec<FunctionRecord>,
    /// Resident slots stay empty when their module failed to load.
    wrappers: Vec<Option<WrapperRecord>>,
    make_seqs: Vec<MakeSeqRecord>,
    global_types: Vec<TypeIndex>,
    global_functions: Vec<FunctionIndex>,
    globals: Vec<ElementIndex>,
    names: NameIndex,
    modules: Vec<LoadedModule>,
}

fn lookup<H: Handle, T>(table: &[T], handle: H) -> Option<&T> {
    table.get(handle.slot()?)
}

fn nth<H: Copy>(list: &[H], n: usize) -> Option<H> {
    list.get(n).copied()
}

impl Database {
    /// An empty database with the first `reserved` wrapper handles set aside
    /// for resident tables.
    pub(crate) fn with_reserved_wrappers(reserved: usize) -> Self {
        let mut wrappers = Vec::new();
        wrappers.resize_with(reserved, || None);
        Self {
            wrappers,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.functions.is_empty() && self.manifests.is_empty()
    }

    pub fn modules(&self) -> &[LoadedModule] {
        &self.modules
    }

    pub fn manifest(&self, manifest: ManifestIndex) -> Option<&ManifestRecord> {
        lookup(&self.manifests, manifest)
    }

    pub fn element(&self, element: ElementIndex) -> Option<&ElementRecord> {
        lookup(&self.elements, element)
    }

    pub fn type_record(&self, ty: TypeIndex) -> Option<&TypeRecord> {
        lookup(&self.types, ty)
    }

    pub fn function(&self, function: FunctionIndex) -> Option<&FunctionRecord> {
        lookup(&self.functions, function)
    }

    pub fn wrapper(&self, wrapper: WrapperIndex) -> Option<&WrapperRecord> {
        lookup(&self.wrappers, wrapper).and_then(Option::as_ref)
    }

    pub fn make_seq(&self, make_seq: MakeSeqIndex) -> Option<&MakeSeqRecord> {
        lookup(&self.make_seqs, make_seq)
    }

    /// Rebuilds the global lists once every module is merged.
    pub(crate) fn finish(&mut self) {
        self.global_types = (0..self.types.len())
            .filter(|&slot| self.types[slot].is_global)
            .map(TypeIndex::from_slot)
            .collect();
        self.global_functions = (0..self.functions.len())
            .filter(|&slot| !self.functions[slot].is_method())
            .map(FunctionIndex::from_slot)
            .collect();
        self.globals = (0..self.elements.len())
            .filter(|&slot| self.elements[slot].is_global())
            .map(ElementIndex::from_slot)
            .collect();
    }
}
