use idb_index::{FunctionIndex, TypeIndex, WrapperIndex};
use idb_ty::TypeShape;

use super::Database;
use crate::error::LoadError;

impl Database {
    /// Cross-module consistency pass, run once every artifact is merged.
    /// Repairs what can be derived and returns every violation found.
    pub(crate) fn validate(&mut self) -> Vec<LoadError> {
        let mut errors = Vec::new();
        self.check_receivers(&mut errors);
        self.hide_invisible_members();
        self.check_wrap_chains(&mut errors);
        self.mark_inherited_destructors(&mut errors);
        errors
    }

    fn check_receivers(&self, errors: &mut Vec<LoadError>) {
        for (slot, wrapper) in self.wrappers.iter().enumerate() {
            let Some(wrapper) = wrapper else {
                continue;
            };
            if !wrapper.receiver_is_well_formed() {
                errors.push(LoadError::MisplacedReceiver {
                    wrapper: WrapperIndex::from_slot(slot),
                });
            }
        }
    }

    /// Forward declarations and unpublished types keep their shape and
    /// derivations but expose no members.
    fn hide_invisible_members(&mut self) {
        for record in &mut self.types {
            if let TypeShape::Extension(extension) = &mut record.shape
                && !extension.has_visible_members()
            {
                extension.clear_members();
            }
        }
    }

    fn check_wrap_chains(&self, errors: &mut Vec<LoadError>) {
        for slot in 0..self.types.len() {
            let ty = TypeIndex::from_slot(slot);
            if self.types[slot].wrapped_type().is_some() && self.unwrap_type(ty).is_none() {
                errors.push(LoadError::WrappedCycle { ty });
            }
        }
    }

    /// A destructor shared (by handle) with an ancestor is inherited, and an
    /// inherited destructor must be virtual.
    fn mark_inherited_destructors(&mut self, errors: &mut Vec<LoadError>) {
        let inherited: Vec<(usize, FunctionIndex)> = (0..self.types.len())
            .filter_map(|slot| {
                let ty = TypeIndex::from_slot(slot);
                let extension = self.types[slot].members()?;
                let destructor = extension.destructor?;
                let shared = self.ancestors(ty).into_iter().any(|ancestor| {
                    self.type_record(ancestor)
                        .and_then(|record| record.members())
                        .is_some_and(|base| base.destructor == Some(destructor))
                });
                (shared || extension.destructor_inherited).then_some((slot, destructor))
            })
            .collect();

        for (slot, destructor) in inherited {
            let is_virtual = self
                .function(destructor)
                .is_some_and(|function| function.flags.is_virtual);
            if !is_virtual {
                errors.push(LoadError::InheritedDestructorNotVirtual {
                    ty: TypeIndex::from_slot(slot),
                });
            }
            if let Some(extension) = self.types[slot].extension_type_mut() {
                extension.destructor_inherited = true;
            }
        }
    }
}
