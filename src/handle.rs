//! The loader: one [`DatabaseHandle`] owns the search configuration, the
//! resident wrapper table and the lazily loaded [`Database`].

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use idb_config::{LoaderConfig, SearchConfig};
use idb_ffi::{DynamicLibraryLoader, submitted_modules};
use idb_index::{RegisteredModule, ResidentModule, ResidentTable, WrapperFn, WrapperIndex};
use idb_utils::Stopwatch;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::artifact::read_artifact;
use crate::db::{Database, ModuleSource};
use crate::error::LoadError;

/// Progress of the one-time load. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LoadState {
    Unloaded = 0,
    Loading = 1,
    Loaded = 2,
}

impl LoadState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Unloaded,
            1 => Self::Loading,
            _ => Self::Loaded,
        }
    }
}

/// Entry point to the interface database.
///
/// Configuration and module registration are accepted until the first call
/// to [`DatabaseHandle::db`], which loads every registered module exactly
/// once, however many threads ask at the same time. Wrapper addresses and
/// unique-name lookups are served from the resident table and never load.
pub struct DatabaseHandle {
    /// Also serialises registration against the start of the load.
    config: Mutex<SearchConfig>,
    resident: ResidentTable,
    state: AtomicU8,
    error: AtomicBool,
    database: OnceCell<Database>,
}

impl Default for DatabaseHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseHandle {
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            config: Mutex::new(config.search),
            resident: ResidentTable::new(),
            state: AtomicU8::new(LoadState::Unloaded as u8),
            error: AtomicBool::new(false),
            database: OnceCell::new(),
        }
    }

    /// Process-wide handle configured from the environment, with every
    /// statically submitted module registered.
    pub fn global() -> &'static Self {
        static GLOBAL: Lazy<DatabaseHandle> = Lazy::new(|| {
            let handle = DatabaseHandle::with_config(LoaderConfig::from_env());
            handle.register_submitted_modules();
            handle
        });
        &GLOBAL
    }

    /// `Loaded` exactly when [`DatabaseHandle::database_if_loaded`] answers.
    pub fn state(&self) -> LoadState {
        if self.database.get().is_some() {
            return LoadState::Loaded;
        }
        LoadState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == LoadState::Loaded
    }

    /// Sticky: true once anything went wrong while registering or loading.
    pub fn error_flag(&self) -> bool {
        self.error.load(Ordering::Acquire)
    }

    fn raise_error(&self, error: &LoadError) {
        warn!(error = %error, "interrogate database error");
        self.error.store(true, Ordering::Release);
    }

    /// Runs `change` on the search configuration unless the load has started.
    fn configure(&self, what: &str, change: impl FnOnce(&mut SearchConfig)) -> bool {
        let mut config = self.config.lock();
        if self.state() != LoadState::Unloaded {
            warn!(setting = what, "database already loading, ignoring configuration change");
            return false;
        }
        change(&mut config);
        true
    }

    /// Searches `dir` after every directory added before it.
    pub fn add_search_directory(&self, dir: impl Into<PathBuf>) -> bool {
        let dir = dir.into();
        self.configure("search directory", |config| {
            debug!(dir = %dir.display(), "adding search directory");
            config.add_directory(dir);
        })
    }

    /// Adds a `PATH`-style list, searched after all directories.
    pub fn add_search_path(&self, path: &str) -> bool {
        self.configure("search path", |config| {
            debug!(path, "adding search path");
            config.add_path_string(path);
        })
    }

    /// Registers a module and reserves wrapper handles for its resident
    /// table. Refused once the load has started.
    pub fn register_module(&self, module: ResidentModule) -> bool {
        let _config = self.config.lock();
        if self.state() != LoadState::Unloaded {
            warn!(
                library = %module.library_name,
                "database already loading, ignoring module registration"
            );
            return false;
        }

        let library = module.library_name.clone();
        let registration = self.resident.register(module);
        for collision in registration.collisions {
            self.raise_error(&collision.into());
        }
        debug!(
            library = %library,
            wrapper_base = registration.wrapper_base,
            "registered module"
        );
        true
    }

    /// Registers every module submitted through `inventory`.
    pub fn register_submitted_modules(&self) -> usize {
        let mut registered = 0;
        for module in submitted_modules() {
            if self.register_module(module) {
                registered += 1;
            }
        }
        registered
    }

    /// Loads a hosting library and registers the module it exports.
    pub fn register_library(&self, path: &Path) -> anyhow::Result<bool> {
        let module = DynamicLibraryLoader::global().load_module(path)?;
        Ok(self.register_module(module))
    }

    /// The full database, loading it on first use. After a failed load this
    /// is whatever could be loaded consistently, possibly nothing.
    pub fn db(&self) -> &Database {
        let database = self.database.get_or_init(|| self.load());
        self.state
            .store(LoadState::Loaded as u8, Ordering::Release);
        database
    }

    /// The database if the load already finished; never loads.
    pub fn database_if_loaded(&self) -> Option<&Database> {
        self.database.get()
    }

    pub fn has_wrapper_pointer(&self, wrapper: WrapperIndex) -> bool {
        self.resident.has_pointer(wrapper)
    }

    /// Resident callable address of `wrapper`.
    pub fn wrapper_pointer(&self, wrapper: WrapperIndex) -> Option<WrapperFn> {
        self.resident.pointer(wrapper)
    }

    /// Reverse lookup of a unique name. Resident names resolve before the
    /// load; names of modules without a resident table once it is done.
    pub fn wrapper_by_unique_name(&self, unique_name: &str) -> Option<WrapperIndex> {
        self.resident.resolve(unique_name).or_else(|| {
            self.database_if_loaded()?
                .wrapper_by_unique_name(unique_name)
        })
    }

    pub fn wrapper_unique_name(&self, wrapper: WrapperIndex) -> Option<Cow<'static, str>> {
        self.resident.unique_name(wrapper).or_else(|| {
            let name = self.database_if_loaded()?.wrapper_unique_name(wrapper);
            (!name.is_empty()).then(|| Cow::Owned(name.to_owned()))
        })
    }

    fn load(&self) -> Database {
        let (config, modules) = {
            let config = self.config.lock();
            self.state
                .store(LoadState::Loading as u8, Ordering::Release);
            (config.clone(), self.resident.modules())
        };

        let stopwatch = Stopwatch::start_new();
        info!(modules = modules.len(), "loading interrogate database");

        let mut database = Database::with_reserved_wrappers(self.resident.reserved());
        for registered in &modules {
            if let Err(error) = load_module(&mut database, &config, &self.resident, registered) {
                self.raise_error(&error);
            }
        }
        for error in database.validate() {
            self.raise_error(&error);
        }
        database.finish();

        info!(
            modules = database.modules().len(),
            types = database.number_of_types(),
            functions = database.number_of_functions(),
            elapsed_ms = stopwatch.elapsed_ms(),
            error = self.error_flag(),
            "interrogate database loaded"
        );
        database
    }
}

fn load_module(
    database: &mut Database,
    config: &SearchConfig,
    reserved: &ResidentTable,
    registered: &RegisteredModule,
) -> Result<(), LoadError> {
    let module = &registered.module;
    let path = config
        .find(&module.database_filename)
        .ok_or_else(|| LoadError::NotFound {
            file: module.database_filename.to_string(),
            searched: config.search_dirs(),
        })?;

    let artifact = read_artifact(&path)?;
    let source = ModuleSource {
        path,
        resident: module
            .wrappers
            .as_deref()
            .map(|wrappers| (wrappers, registered.wrapper_base)),
        reserved,
    };
    database.merge(artifact, &source)
}
