//! Pointer conversions along the derivation graph and wrapped-type
//! decomposition.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use idb_index::{FunctionIndex, TypeIndex};
use idb_ty::{Derivation, Downcast, Upcast, WrapKind};

use super::Database;
use crate::error::CastError;

/// One single-edge pointer conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastStep {
    /// The pointer is reused bit-for-bit.
    Identity { from: TypeIndex, to: TypeIndex },
    /// The pointer must be passed through `function`.
    Call {
        from: TypeIndex,
        to: TypeIndex,
        function: FunctionIndex,
    },
}

impl CastStep {
    pub fn from(self) -> TypeIndex {
        match self {
            Self::Identity { from, .. } | Self::Call { from, .. } => from,
        }
    }

    pub fn to(self) -> TypeIndex {
        match self {
            Self::Identity { to, .. } | Self::Call { to, .. } => to,
        }
    }

    pub fn function(self) -> Option<FunctionIndex> {
        match self {
            Self::Call { function, .. } => Some(function),
            Self::Identity { .. } => None,
        }
    }
}

/// Ordered conversion steps; apply them first to last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CastPath {
    steps: Vec<CastStep>,
}

impl CastPath {
    pub fn steps(&self) -> &[CastStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// No step needs a call: the converted pointer equals the original.
    pub fn is_identity(&self) -> bool {
        self.steps.iter().all(|step| step.function().is_none())
    }

    pub fn functions(&self) -> impl Iterator<Item = FunctionIndex> + '_ {
        self.steps.iter().filter_map(|step| step.function())
    }
}

/// A type with its pointer, const and typedef layers peeled off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unwrapped {
    /// The first non-wrapped type.
    pub base: TypeIndex,
    pub pointer_depth: u32,
    pub is_const: bool,
    pub typedef: bool,
    /// Number of wrap levels removed.
    pub levels: u32,
}

impl Database {
    /// Direct base-class edges of `ty`.
    pub(crate) fn bases(&self, ty: TypeIndex) -> &[Derivation] {
        self.type_record(ty)
            .and_then(|record| record.extension_type())
            .map(|extension| extension.derivations.as_slice())
            .unwrap_or_default()
    }

    /// The direct edge from `derived` to `base`, if there is one.
    pub fn derivation(&self, derived: TypeIndex, base: TypeIndex) -> Option<&Derivation> {
        self.bases(derived)
            .iter()
            .find(|derivation| derivation.base == base)
    }

    /// Every transitive base of `ty`, nearest first.
    pub fn ancestors(&self, ty: TypeIndex) -> Vec<TypeIndex> {
        let mut seen = AHashSet::new();
        let mut queue = VecDeque::from([ty]);
        let mut ancestors = Vec::new();
        seen.insert(ty);
        while let Some(current) = queue.pop_front() {
            for derivation in self.bases(current) {
                if seen.insert(derivation.base) {
                    ancestors.push(derivation.base);
                    queue.push_back(derivation.base);
                }
            }
        }
        ancestors
    }

    /// Shortest chain of edges leading from `derived` up to `base`, keeping
    /// only edges accepted by `usable`. Each entry is `(child, edge)`.
    fn derivation_chain(
        &self,
        derived: TypeIndex,
        base: TypeIndex,
        usable: impl Fn(&Derivation) -> bool,
    ) -> Option<Vec<(TypeIndex, Derivation)>> {
        let mut reached: AHashMap<TypeIndex, (TypeIndex, Derivation)> = AHashMap::new();
        let mut queue = VecDeque::from([derived]);
        while let Some(current) = queue.pop_front() {
            if current == base {
                break;
            }
            for derivation in self.bases(current).iter().filter(|edge| usable(edge)) {
                if derivation.base != derived && !reached.contains_key(&derivation.base) {
                    reached.insert(derivation.base, (current, *derivation));
                    queue.push_back(derivation.base);
                }
            }
        }

        let mut chain = Vec::new();
        let mut current = base;
        while current != derived {
            let (child, edge) = reached.get(&current)?;
            chain.push((*child, *edge));
            current = *child;
        }
        chain.reverse();
        Some(chain)
    }

    fn check_known(&self, ty: TypeIndex) -> Result<(), CastError> {
        match self.type_record(ty) {
            Some(_) => Ok(()),
            None => Err(CastError::UnknownType(ty)),
        }
    }

    /// Steps converting a `derived` pointer into an `ancestor` pointer.
    pub fn resolve_upcast(
        &self,
        derived: TypeIndex,
        ancestor: TypeIndex,
    ) -> Result<CastPath, CastError> {
        self.check_known(derived)?;
        self.check_known(ancestor)?;
        let chain = self
            .derivation_chain(derived, ancestor, |_| true)
            .ok_or(CastError::NotDerived {
                derived,
                base: ancestor,
            })?;

        let steps = chain
            .into_iter()
            .map(|(child, edge)| match edge.upcast {
                Upcast::Identity => CastStep::Identity {
                    from: child,
                    to: edge.base,
                },
                Upcast::Function(function) => CastStep::Call {
                    from: child,
                    to: edge.base,
                    function,
                },
            })
            .collect();
        Ok(CastPath { steps })
    }

    /// Steps converting an `ancestor` pointer back into a `derived` pointer.
    /// Fails when every route crosses an edge that cannot be downcast.
    pub fn resolve_downcast(
        &self,
        ancestor: TypeIndex,
        derived: TypeIndex,
    ) -> Result<CastPath, CastError> {
        self.check_known(derived)?;
        self.check_known(ancestor)?;
        let Some(chain) =
            self.derivation_chain(derived, ancestor, |edge| !edge.downcast_is_impossible())
        else {
            return Err(
                if self.derivation_chain(derived, ancestor, |_| true).is_some() {
                    CastError::DowncastImpossible {
                        derived,
                        base: ancestor,
                    }
                } else {
                    CastError::NotDerived {
                        derived,
                        base: ancestor,
                    }
                },
            );
        };

        let mut steps = Vec::with_capacity(chain.len());
        for (child, edge) in chain.into_iter().rev() {
            steps.push(match edge.downcast {
                Downcast::Identity => CastStep::Identity {
                    from: edge.base,
                    to: child,
                },
                Downcast::Function(function) => CastStep::Call {
                    from: edge.base,
                    to: child,
                    function,
                },
                Downcast::Impossible => {
                    return Err(CastError::DowncastImpossible {
                        derived,
                        base: ancestor,
                    });
                }
            });
        }
        Ok(CastPath { steps })
    }

    /// Peels pointer, const and typedef layers off `ty`. `None` for unknown
    /// handles and for chains that never reach a non-wrapped type.
    pub fn unwrap_type(&self, ty: TypeIndex) -> Option<Unwrapped> {
        let mut unwrapped = Unwrapped {
            base: ty,
            pointer_depth: 0,
            is_const: false,
            typedef: false,
            levels: 0,
        };
        for _ in 0..=self.types.len() {
            let record = self.type_record(unwrapped.base)?;
            let Some(wrapped) = record.wrapped_type() else {
                return Some(unwrapped);
            };
            match wrapped.kind {
                WrapKind::Pointer => unwrapped.pointer_depth += 1,
                WrapKind::Const => unwrapped.is_const = true,
                WrapKind::Typedef => unwrapped.typedef = true,
            }
            unwrapped.levels += 1;
            unwrapped.base = wrapped.wrapped;
        }
        None
    }

    /// The destructor a caller may invoke on a `ty` instance: the type's own,
    /// or an inherited one only when it is virtual.
    pub fn safe_destructor(&self, ty: TypeIndex) -> Option<FunctionIndex> {
        let extension = self.type_record(ty)?.members()?;
        let destructor = extension.destructor?;
        if !extension.destructor_inherited {
            return Some(destructor);
        }
        self.function(destructor)
            .filter(|function| function.flags.is_virtual)
            .map(|_| destructor)
    }
}
