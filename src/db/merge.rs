use std::path::PathBuf;

use ahash::AHashMap;
use idb_index::{
    ElementIndex, FunctionIndex, Handle, ManifestIndex, ResidentError, ResidentTable,
    ResidentWrapper, TypeIndex, WrapperIndex,
};
use idb_ty::{
    Downcast, ElementRecord, FunctionRecord, MakeSeqRecord, ManifestRecord, ManifestValue,
    ModuleArtifact, ReturnOwnership, TypeRecord, TypeShape, Upcast, WrapperRecord,
};
use tracing::debug;

use super::{Database, LoadedModule};
use crate::error::LoadError;

/// Where an artifact was read from and, for modules with a resident table,
/// the table and the first wrapper slot reserved for it. `reserved` holds
/// every registered resident name, loaded or not.
pub(crate) struct ModuleSource<'a> {
    pub path: PathBuf,
    pub resident: Option<(&'a [ResidentWrapper], usize)>,
    pub reserved: &'a ResidentTable,
}

/// Moves a module-local index space to `base` in the global one.
#[derive(Clone, Copy)]
struct Shift {
    base: usize,
    len: usize,
}

impl Shift {
    fn new(base: usize, len: usize) -> Self {
        Self { base, len }
    }
}

struct Remap<'a> {
    module: &'a str,
    types: Vec<TypeIndex>,
    functions: Shift,
    wrappers: Shift,
    elements: Shift,
    make_seqs: Shift,
}

impl Remap<'_> {
    fn dangling<H: Handle>(&self, local: H) -> LoadError {
        LoadError::DanglingIndex {
            module: self.module.to_owned(),
            kind: H::KIND,
            raw: local.raw(),
        }
    }

    fn shift<H: Handle>(&self, shift: Shift, local: H) -> Result<H, LoadError> {
        match local.slot() {
            Some(slot) if slot < shift.len => Ok(H::from_slot(shift.base + slot)),
            _ => Err(self.dangling(local)),
        }
    }

    fn shift_all<H: Handle>(&self, shift: Shift, list: &mut [H]) -> Result<(), LoadError> {
        for handle in list {
            *handle = self.shift(shift, *handle)?;
        }
        Ok(())
    }

    fn ty(&self, local: TypeIndex) -> Result<TypeIndex, LoadError> {
        local
            .slot()
            .and_then(|slot| self.types.get(slot).copied())
            .ok_or_else(|| self.dangling(local))
    }

    fn opt_ty(&self, local: Option<TypeIndex>) -> Result<Option<TypeIndex>, LoadError> {
        local.map(|ty| self.ty(ty)).transpose()
    }

    fn function(&self, local: FunctionIndex) -> Result<FunctionIndex, LoadError> {
        self.shift(self.functions, local)
    }

    fn opt_function(
        &self,
        local: Option<FunctionIndex>,
    ) -> Result<Option<FunctionIndex>, LoadError> {
        local.map(|function| self.function(function)).transpose()
    }

    fn type_record(&self, mut record: TypeRecord) -> Result<TypeRecord, LoadError> {
        record.outer_class = self.opt_ty(record.outer_class)?;
        match &mut record.shape {
            TypeShape::Atomic(_) | TypeShape::Enum(_) => {}
            TypeShape::Wrapped(wrapped) => wrapped.wrapped = self.ty(wrapped.wrapped)?,
            TypeShape::Array(array) => array.element = self.ty(array.element)?,
            TypeShape::Extension(extension) => {
                self.shift_all(self.functions, &mut extension.constructors)?;
                extension.destructor = self.opt_function(extension.destructor)?;
                self.shift_all(self.functions, &mut extension.methods)?;
                self.shift_all(self.functions, &mut extension.casts)?;
                self.shift_all(self.elements, &mut extension.elements)?;
                self.shift_all(self.make_seqs, &mut extension.make_seqs)?;
                for derivation in &mut extension.derivations {
                    derivation.base = self.ty(derivation.base)?;
                    if let Upcast::Function(function) = &mut derivation.upcast {
                        *function = self.function(*function)?;
                    }
                    if let Downcast::Function(function) = &mut derivation.downcast {
                        *function = self.function(*function)?;
                    }
                }
                for nested in &mut extension.nested_types {
                    *nested = self.ty(*nested)?;
                }
            }
        }
        Ok(record)
    }

    fn function_record(&self, mut record: FunctionRecord) -> Result<FunctionRecord, LoadError> {
        record.class = self.opt_ty(record.class)?;
        for convention in &mut record.conventions {
            self.shift_all(self.wrappers, &mut convention.wrappers)?;
        }
        Ok(record)
    }

    fn wrapper_record(&self, mut record: WrapperRecord) -> Result<WrapperRecord, LoadError> {
        record.function = self.function(record.function)?;
        for param in &mut record.parameters {
            param.ty = self.ty(param.ty)?;
        }
        record.return_type = self.opt_ty(record.return_type)?;
        if let ReturnOwnership::CallerManaged { destructor } = &mut record.return_ownership {
            *destructor = self.function(*destructor)?;
        }
        Ok(record)
    }

    fn element_record(&self, mut record: ElementRecord) -> Result<ElementRecord, LoadError> {
        record.owner = self.opt_ty(record.owner)?;
        record.ty = self.ty(record.ty)?;
        record.getter = self.opt_function(record.getter)?;
        record.setter = self.opt_function(record.setter)?;
        Ok(record)
    }

    fn manifest_record(&self, mut record: ManifestRecord) -> Result<ManifestRecord, LoadError> {
        match &mut record.value {
            ManifestValue::Literal => {}
            ManifestValue::Int { ty, .. } => *ty = self.opt_ty(*ty)?,
            ManifestValue::Getter { ty, getter } => {
                *ty = self.ty(*ty)?;
                *getter = self.function(*getter)?;
            }
        }
        Ok(record)
    }

    fn make_seq_record(&self, mut record: MakeSeqRecord) -> Result<MakeSeqRecord, LoadError> {
        record.num_getter = self.function(record.num_getter)?;
        record.element_getter = self.function(record.element_getter)?;
        Ok(record)
    }
}

fn remap_all<T>(
    records: Vec<T>,
    remap: impl Fn(T) -> Result<T, LoadError>,
) -> Result<Vec<T>, LoadError> {
    records.into_iter().map(remap).collect()
}

fn index_name<H: Copy>(map: &mut AHashMap<String, H>, name: &str, handle: H) {
    if !name.is_empty() {
        map.entry(name.to_owned()).or_insert(handle);
    }
}

fn index_overload(
    map: &mut AHashMap<String, Vec<FunctionIndex>>,
    name: &str,
    function: FunctionIndex,
) {
    if !name.is_empty() {
        map.entry(name.to_owned()).or_default().push(function);
    }
}

impl Database {
    /// Merges one module's artifact. Either the whole artifact is merged or,
    /// on error, nothing of it is.
    pub(crate) fn merge(
        &mut self,
        artifact: ModuleArtifact,
        source: &ModuleSource<'_>,
    ) -> Result<(), LoadError> {
        let module = if artifact.module_name.is_empty() {
            artifact.library_name.clone()
        } else {
            artifact.module_name.clone()
        };
        if !artifact.is_compatible() {
            return Err(LoadError::IncompatibleFormat {
                module,
                found: artifact.format_version,
            });
        }

        let ModuleArtifact {
            library_name,
            manifests,
            types,
            functions,
            mut wrappers,
            elements,
            make_seqs,
            ..
        } = artifact;

        let wrapper_base = match source.resident {
            Some((resident, base)) => {
                check_resident_table(&module, &mut wrappers, resident, base)?;
                base
            }
            None => self.wrappers.len(),
        };

        let mut next_type = self.types.len();
        let type_map = types
            .iter()
            .map(|record| match self.names.types_true.get(&record.true_name) {
                Some(existing) if !record.true_name.is_empty() => *existing,
                _ => {
                    next_type += 1;
                    TypeIndex::from_slot(next_type - 1)
                }
            })
            .collect();

        let remap = Remap {
            module: &module,
            types: type_map,
            functions: Shift::new(self.functions.len(), functions.len()),
            wrappers: Shift::new(wrapper_base, wrappers.len()),
            elements: Shift::new(self.elements.len(), elements.len()),
            make_seqs: Shift::new(self.make_seqs.len(), make_seqs.len()),
        };

        let types = remap_all(types, |record| remap.type_record(record))?;
        let functions = remap_all(functions, |record| remap.function_record(record))?;
        let wrappers = remap_all(wrappers, |record| remap.wrapper_record(record))?;
        let elements = remap_all(elements, |record| remap.element_record(record))?;
        let manifests = remap_all(manifests, |record| remap.manifest_record(record))?;
        let make_seqs = remap_all(make_seqs, |record| remap.make_seq_record(record))?;

        if source.resident.is_none() {
            self.check_unique_names(&wrappers, wrapper_base, source.reserved)?;
        }

        debug!(
            module = %module,
            types = types.len(),
            functions = functions.len(),
            wrappers = wrappers.len(),
            "merging module"
        );

        let type_map = remap.types;
        for (record, global) in types.into_iter().zip(type_map) {
            self.commit_type(global, record);
        }

        let first_manifest = self.manifests.len();
        for (position, record) in manifests.into_iter().enumerate() {
            let index = ManifestIndex::from_slot(first_manifest + position);
            index_name(&mut self.names.manifests, &record.name, index);
            self.manifests.push(record);
        }

        let first_element = self.elements.len();
        for (position, record) in elements.into_iter().enumerate() {
            let index = ElementIndex::from_slot(first_element + position);
            index_name(&mut self.names.elements, &record.name, index);
            index_name(&mut self.names.elements_scoped, &record.scoped_name, index);
            self.elements.push(record);
        }

        let first_function = self.functions.len();
        for (position, record) in functions.into_iter().enumerate() {
            let index = FunctionIndex::from_slot(first_function + position);
            index_overload(&mut self.names.functions, &record.name, index);
            index_overload(&mut self.names.functions_scoped, &record.scoped_name, index);
            self.functions.push(record);
        }
        self.make_seqs.extend(make_seqs);

        for (position, record) in wrappers.into_iter().enumerate() {
            let slot = wrapper_base + position;
            if slot >= self.wrappers.len() {
                self.wrappers.resize_with(slot + 1, || None);
            }
            index_name(
                &mut self.names.wrappers,
                &record.unique_name,
                WrapperIndex::from_slot(slot),
            );
            self.wrappers[slot] = Some(record);
        }

        self.modules.push(LoadedModule {
            library_name,
            module_name: module,
            path: source.path.clone(),
        });
        Ok(())
    }

    fn commit_type(&mut self, global: TypeIndex, record: TypeRecord) {
        let Some(slot) = global.slot() else {
            return;
        };

        if slot == self.types.len() {
            index_name(&mut self.names.types, &record.name, global);
            index_name(&mut self.names.types_scoped, &record.scoped_name, global);
            index_name(&mut self.names.types_true, &record.true_name, global);
            self.types.push(record);
            return;
        }

        let Some(existing) = self.types.get_mut(slot) else {
            return;
        };
        let is_global = existing.is_global || record.is_global;
        if existing.is_forward_declaration() && !record.is_forward_declaration() {
            debug!(true_name = %record.true_name, "definition replaces forward declaration");
            *existing = record;
        }
        existing.is_global = is_global;
    }

    /// Unique names of wrappers that were not reserved through a resident
    /// table must not clash with any other wrapper, merged or reserved.
    fn check_unique_names(
        &self,
        wrappers: &[WrapperRecord],
        wrapper_base: usize,
        reserved: &ResidentTable,
    ) -> Result<(), LoadError> {
        let mut seen: AHashMap<&str, WrapperIndex> = AHashMap::new();
        for (position, record) in wrappers.iter().enumerate() {
            if record.unique_name.is_empty() {
                continue;
            }
            let wrapper = WrapperIndex::from_slot(wrapper_base + position);
            let existing = self
                .names
                .wrappers
                .get(&record.unique_name)
                .copied()
                .or_else(|| reserved.resolve(&record.unique_name))
                .or_else(|| seen.get(record.unique_name.as_str()).copied());
            if let Some(existing) = existing {
                return Err(ResidentError::DuplicateUniqueName {
                    name: record.unique_name.clone(),
                    wrapper,
                    existing,
                }
                .into());
            }
            seen.insert(&record.unique_name, wrapper);
        }
        Ok(())
    }
}

/// The artifact's wrappers must be exactly the ones the library links in.
fn check_resident_table(
    module: &str,
    wrappers: &mut [WrapperRecord],
    resident: &[ResidentWrapper],
    base: usize,
) -> Result<(), LoadError> {
    if wrappers.len() != resident.len() {
        return Err(LoadError::WrapperCountMismatch {
            module: module.to_owned(),
            artifact: wrappers.len(),
            resident: resident.len(),
        });
    }

    for (position, (record, linked)) in wrappers.iter_mut().zip(resident).enumerate() {
        if record.unique_name.is_empty() {
            record.unique_name = linked.unique_name.to_string();
        } else if record.unique_name != linked.unique_name {
            return Err(LoadError::WrapperNameMismatch {
                module: module.to_owned(),
                wrapper: WrapperIndex::from_slot(base + position),
                artifact: record.unique_name.clone(),
                resident: linked.unique_name.to_string(),
            });
        }
    }
    Ok(())
}
