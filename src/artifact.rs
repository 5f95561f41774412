//! Reading and producing module artifacts.
//!
//! An artifact is a JSON [`ModuleArtifact`] whose handles are local to the
//! module. [`ArtifactBuilder`] keeps the cross references of a module
//! consistent while it is being assembled.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use idb_index::{
    ElementIndex, FunctionIndex, MakeSeqIndex, ManifestIndex, ResidentModule, ResidentWrapper,
    TypeIndex, WrapperFn, WrapperIndex,
};
use idb_ty::{
    Derivation, ElementRecord, ExtensionType, FunctionRecord, MakeSeqRecord, ManifestRecord,
    ModuleArtifact, TypeRecord, WrapperRecord,
};
use tracing::debug;

use crate::error::LoadError;
use crate::unique_name::wrapper_unique_name;

pub(crate) fn read_artifact(path: &Path) -> Result<ModuleArtifact, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact = serde_json::from_slice(&bytes).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read artifact");
    Ok(artifact)
}

/// Assembles one module's artifact, handing out module-local handles.
#[derive(Debug, Clone)]
pub struct ArtifactBuilder {
    artifact: ModuleArtifact,
}

impl ArtifactBuilder {
    pub fn new(library_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self {
            artifact: ModuleArtifact::new(library_name, module_name),
        }
    }

    pub fn add_type(&mut self, record: TypeRecord) -> TypeIndex {
        self.artifact.types.push(record);
        TypeIndex::from_slot(self.artifact.types.len() - 1)
    }

    /// A nested type: records `outer` as its outer class and lists it there.
    pub fn add_nested_type(&mut self, outer: TypeIndex, mut record: TypeRecord) -> TypeIndex {
        record.outer_class = Some(outer);
        let ty = self.add_type(record);
        if let Some(extension) = self.extension_mut(outer) {
            extension.nested_types.push(ty);
        }
        ty
    }

    pub fn add_function(&mut self, record: FunctionRecord) -> FunctionIndex {
        self.artifact.functions.push(record);
        FunctionIndex::from_slot(self.artifact.functions.len() - 1)
    }

    /// Adds a method of `class` and lists it as a constructor, destructor,
    /// cast operator or plain method according to its flags.
    pub fn add_method(&mut self, class: TypeIndex, mut record: FunctionRecord) -> FunctionIndex {
        record.class = Some(class);
        let flags = record.flags;
        let function = self.add_function(record);
        if let Some(extension) = self.extension_mut(class) {
            if flags.is_constructor {
                extension.constructors.push(function);
            } else if flags.is_destructor {
                extension.destructor = Some(function);
            } else if flags.is_operator_typecast {
                extension.casts.push(function);
            } else {
                extension.methods.push(function);
            }
        }
        function
    }

    /// Adds a wrapper of `record.function` under `convention`. A missing
    /// unique name is derived from the function's scoped name, the
    /// convention and the wrapper's signature.
    pub fn add_wrapper(&mut self, convention: &str, mut record: WrapperRecord) -> WrapperIndex {
        if record.unique_name.is_empty() {
            let scoped_name = self
                .function_mut(record.function)
                .map(|function| function.scoped_name.clone())
                .unwrap_or_default();
            let signature = record.signature(|ty| self.type_spelling(ty));
            record.unique_name =
                wrapper_unique_name(&scoped_name, &format!("{convention} {signature}"));
        }
        let function = record.function;
        self.artifact.wrappers.push(record);
        let wrapper = WrapperIndex::from_slot(self.artifact.wrappers.len() - 1);
        if let Some(function) = self.function_mut(function) {
            function.push_wrapper(convention, wrapper);
        }
        wrapper
    }

    /// Adds an element, listing it on its owner when it is a data member.
    pub fn add_element(&mut self, record: ElementRecord) -> ElementIndex {
        let owner = record.owner;
        self.artifact.elements.push(record);
        let element = ElementIndex::from_slot(self.artifact.elements.len() - 1);
        if let Some(extension) = owner.and_then(|owner| self.extension_mut(owner)) {
            extension.elements.push(element);
        }
        element
    }

    pub fn add_manifest(&mut self, record: ManifestRecord) -> ManifestIndex {
        self.artifact.manifests.push(record);
        ManifestIndex::from_slot(self.artifact.manifests.len() - 1)
    }

    pub fn add_make_seq(&mut self, class: TypeIndex, record: MakeSeqRecord) -> MakeSeqIndex {
        self.artifact.make_seqs.push(record);
        let make_seq = MakeSeqIndex::from_slot(self.artifact.make_seqs.len() - 1);
        if let Some(extension) = self.extension_mut(class) {
            extension.make_seqs.push(make_seq);
        }
        make_seq
    }

    pub fn add_derivation(&mut self, derived: TypeIndex, derivation: Derivation) {
        if let Some(extension) = self.extension_mut(derived) {
            extension.derivations.push(derivation);
        }
    }

    pub fn type_mut(&mut self, ty: TypeIndex) -> Option<&mut TypeRecord> {
        self.artifact.types.get_mut(ty.slot()?)
    }

    pub fn extension_mut(&mut self, ty: TypeIndex) -> Option<&mut ExtensionType> {
        self.type_mut(ty)?.extension_type_mut()
    }

    pub fn function_mut(&mut self, function: FunctionIndex) -> Option<&mut FunctionRecord> {
        self.artifact.functions.get_mut(function.slot()?)
    }

    pub fn wrapper_mut(&mut self, wrapper: WrapperIndex) -> Option<&mut WrapperRecord> {
        self.artifact.wrappers.get_mut(wrapper.slot()?)
    }

    fn type_spelling(&self, ty: TypeIndex) -> String {
        ty.slot()
            .and_then(|slot| self.artifact.types.get(slot))
            .map_or_else(|| ty.to_string(), |record| record.true_name.clone())
    }

    pub fn artifact(&self) -> &ModuleArtifact {
        &self.artifact
    }

    /// The resident table a hosting library would link in for this module,
    /// with addresses supplied by `pointer`.
    pub fn resident_module(
        &self,
        database_filename: impl Into<String>,
        pointer: impl Fn(WrapperIndex) -> Option<WrapperFn>,
    ) -> ResidentModule {
        let wrappers = self
            .artifact
            .wrappers
            .iter()
            .enumerate()
            .map(|(slot, record)| {
                ResidentWrapper::owned(
                    record.unique_name.clone(),
                    pointer(WrapperIndex::from_slot(slot)),
                )
            })
            .collect();
        ResidentModule::owned(
            self.artifact.library_name.clone(),
            database_filename,
            wrappers,
        )
    }

    pub fn finish(self) -> ModuleArtifact {
        self.artifact
    }

    /// Writes the artifact as `dir/filename`.
    pub fn write(&self, dir: &Path, filename: &str) -> anyhow::Result<PathBuf> {
        let path = dir.join(filename);
        let json = serde_json::to_vec_pretty(&self.artifact)
            .with_context(|| format!("failed to encode {}", self.artifact.library_name))?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}
