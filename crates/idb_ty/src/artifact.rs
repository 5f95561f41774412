//! On-disk layout of one module's share of the database.
//!
//! Handles inside an artifact are local to it: `TypeIndex::from_raw(1)` is
//! the first entry of `types`, and so on. The loader shifts them into the
//! process-wide index spaces when the artifact is merged.

use serde::{Deserialize, Serialize};

use crate::{
    ElementRecord, FunctionRecord, MakeSeqRecord, ManifestRecord, TypeRecord, WrapperRecord,
};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleArtifact {
    pub format_version: u32,
    pub library_name: String,
    #[serde(default)]
    pub module_name: String,
    #[serde(default)]
    pub manifests: Vec<ManifestRecord>,
    #[serde(default)]
    pub types: Vec<TypeRecord>,
    #[serde(default)]
    pub functions: Vec<FunctionRecord>,
    /// In resident-table order when the library links one in.
    #[serde(default)]
    pub wrappers: Vec<WrapperRecord>,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub make_seqs: Vec<MakeSeqRecord>,
}

impl ModuleArtifact {
    pub fn new(library_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            library_name: library_name.into(),
            module_name: module_name.into(),
            ..Self::default()
        }
    }

    pub fn is_compatible(&self) -> bool {
        self.format_version == FORMAT_VERSION
    }
}
