use std::borrow::Cow;

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::warn;

use crate::index::WrapperIndex;

/// Address of a compiled wrapper. Callers cast it to the wrapper's real
/// signature before invoking it.
pub type WrapperFn = extern "C" fn();

/// Load-independent record of one wrapper, linked into the hosting library.
#[derive(Clone, Debug)]
pub struct ResidentWrapper {
    pub unique_name: Cow<'static, str>,
    pub pointer: Option<WrapperFn>,
}

impl ResidentWrapper {
    pub const fn new(unique_name: &'static str, pointer: Option<WrapperFn>) -> Self {
        Self {
            unique_name: Cow::Borrowed(unique_name),
            pointer,
        }
    }

    pub fn owned(unique_name: impl Into<String>, pointer: Option<WrapperFn>) -> Self {
        Self {
            unique_name: Cow::Owned(unique_name.into()),
            pointer,
        }
    }
}

/// A library's contribution to the database: where its artifact lives and,
/// optionally, its resident wrapper table in artifact order.
#[derive(Clone, Debug)]
pub struct ResidentModule {
    pub library_name: Cow<'static, str>,
    pub database_filename: Cow<'static, str>,
    pub wrappers: Option<Cow<'static, [ResidentWrapper]>>,
}

impl ResidentModule {
    pub const fn new(
        library_name: &'static str,
        database_filename: &'static str,
        wrappers: &'static [ResidentWrapper],
    ) -> Self {
        Self {
            library_name: Cow::Borrowed(library_name),
            database_filename: Cow::Borrowed(database_filename),
            wrappers: Some(Cow::Borrowed(wrappers)),
        }
    }

    /// A module whose wrappers are only known once its artifact is read.
    pub fn without_table(
        library_name: impl Into<String>,
        database_filename: impl Into<String>,
    ) -> Self {
        Self {
            library_name: Cow::Owned(library_name.into()),
            database_filename: Cow::Owned(database_filename.into()),
            wrappers: None,
        }
    }

    pub fn owned(
        library_name: impl Into<String>,
        database_filename: impl Into<String>,
        wrappers: Vec<ResidentWrapper>,
    ) -> Self {
        Self {
            library_name: Cow::Owned(library_name.into()),
            database_filename: Cow::Owned(database_filename.into()),
            wrappers: Some(Cow::Owned(wrappers)),
        }
    }

    pub fn has_table(&self) -> bool {
        self.wrappers.is_some()
    }

    pub fn wrapper_count(&self) -> usize {
        self.wrappers.as_ref().map_or(0, |wrappers| wrappers.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResidentError {
    #[error("unique name `{name}` of {wrapper} is already taken by {existing}")]
    DuplicateUniqueName {
        name: String,
        wrapper: WrapperIndex,
        existing: WrapperIndex,
    },
}

/// A module as recorded by [`ResidentTable::register`].
#[derive(Clone, Debug)]
pub struct RegisteredModule {
    pub module: ResidentModule,
    /// Zero-based wrapper table position of the module's first resident wrapper.
    pub wrapper_base: usize,
}

#[derive(Debug, Default)]
pub struct ModuleRegistration {
    pub wrapper_base: usize,
    pub collisions: Vec<ResidentError>,
}

impl ModuleRegistration {
    pub fn is_clean(&self) -> bool {
        self.collisions.is_empty()
    }
}

/// Wrapper data that must be answerable before the full database is read:
/// callable addresses and the unique-name reverse index.
///
/// Wrapper handles are handed out here, at registration time, so they stay
/// the same once the artifact is merged.
#[derive(Default)]
pub struct ResidentTable {
    slots: RwLock<Vec<ResidentWrapper>>,
    by_unique_name: RwLock<AHashMap<String, WrapperIndex>>,
    modules: RwLock<Vec<RegisteredModule>>,
}

impl ResidentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves wrapper handles for the module's resident table. A unique
    /// name that is already taken keeps resolving to its first owner; the
    /// collision is reported back to the caller.
    pub fn register(&self, module: ResidentModule) -> ModuleRegistration {
        let mut slots = self.slots.write();
        let mut names = self.by_unique_name.write();
        let wrapper_base = slots.len();
        let mut collisions = Vec::new();

        for (position, wrapper) in module.wrappers.iter().flat_map(|w| w.iter()).enumerate() {
            let index = WrapperIndex::from_slot(wrapper_base + position);
            match names.get(wrapper.unique_name.as_ref()) {
                Some(existing) => {
                    warn!(
                        unique_name = %wrapper.unique_name,
                        %index,
                        %existing,
                        "duplicate resident unique name"
                    );
                    collisions.push(ResidentError::DuplicateUniqueName {
                        name: wrapper.unique_name.to_string(),
                        wrapper: index,
                        existing: *existing,
                    });
                }
                None => {
                    names.insert(wrapper.unique_name.to_string(), index);
                }
            }
            slots.push(wrapper.clone());
        }

        self.modules.write().push(RegisteredModule {
            module,
            wrapper_base,
        });

        ModuleRegistration {
            wrapper_base,
            collisions,
        }
    }

    pub fn has_pointer(&self, wrapper: WrapperIndex) -> bool {
        self.pointer(wrapper).is_some()
    }

    pub fn pointer(&self, wrapper: WrapperIndex) -> Option<WrapperFn> {
        let slot = wrapper.slot()?;
        self.slots.read().get(slot).and_then(|resident| resident.pointer)
    }

    pub fn unique_name(&self, wrapper: WrapperIndex) -> Option<Cow<'static, str>> {
        let slot = wrapper.slot()?;
        self.slots
            .read()
            .get(slot)
            .map(|resident| resident.unique_name.clone())
    }

    pub fn resolve(&self, unique_name: &str) -> Option<WrapperIndex> {
        self.by_unique_name.read().get(unique_name).copied()
    }

    pub fn contains(&self, unique_name: &str) -> bool {
        self.by_unique_name.read().contains_key(unique_name)
    }

    /// Number of wrapper handles reserved so far.
    pub fn reserved(&self) -> usize {
        self.slots.read().len()
    }

    pub fn modules(&self) -> Vec<RegisteredModule> {
        self.modules.read().clone()
    }
}
