use idb_index::{FunctionIndex, ManifestIndex, TypeIndex};

use super::Database;

impl Database {
    pub fn number_of_manifests(&self) -> usize {
        self.manifests.len()
    }

    pub fn get_manifest(&self, n: usize) -> Option<ManifestIndex> {
        (n < self.manifests.len()).then(|| ManifestIndex::from_slot(n))
    }

    pub fn manifest_by_name(&self, name: &str) -> Option<ManifestIndex> {
        self.names.manifests.get(name).copied()
    }

    pub fn manifest_name(&self, manifest: ManifestIndex) -> &str {
        self.manifest(manifest)
            .map_or("", |record| record.name.as_str())
    }

    /// The raw definition text, available whether or not a typed value is.
    pub fn manifest_definition(&self, manifest: ManifestIndex) -> &str {
        self.manifest(manifest)
            .map_or("", |record| record.definition.as_str())
    }

    pub fn manifest_has_type(&self, manifest: ManifestIndex) -> bool {
        self.manifest_get_type(manifest).is_some()
    }

    pub fn manifest_get_type(&self, manifest: ManifestIndex) -> Option<TypeIndex> {
        self.manifest(manifest)?.ty()
    }

    pub fn manifest_has_getter(&self, manifest: ManifestIndex) -> bool {
        self.manifest_getter(manifest).is_some()
    }

    /// Zero-argument function computing the value.
    pub fn manifest_getter(&self, manifest: ManifestIndex) -> Option<FunctionIndex> {
        self.manifest(manifest)?.getter()
    }

    pub fn manifest_has_int_value(&self, manifest: ManifestIndex) -> bool {
        self.manifest_int_value(manifest).is_some()
    }

    pub fn manifest_int_value(&self, manifest: ManifestIndex) -> Option<i64> {
        self.manifest(manifest)?.int_value()
    }
}
