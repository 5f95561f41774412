use std::collections::HashMap;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use libloading::Library;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::debug;

use idb_index::ResidentModule;

use crate::exports::read_module_def;

/// Thin wrapper around a `libloading::Library` with reference counting so callers
/// can clone handles when sharing across threads.
#[derive(Clone)]
pub struct DynamicLibrary {
    inner: Arc<Library>,
}

impl DynamicLibrary {
    pub fn new(library: Library) -> Self {
        Self {
            inner: Arc::new(library),
        }
    }
}

impl Deref for DynamicLibrary {
    type Target = Library;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

/// Loads hosting libraries on demand and keeps them loaded, so wrapper
/// addresses read from them stay valid for the rest of the process.
pub struct DynamicLibraryLoader {
    cache: Mutex<HashMap<PathBuf, DynamicLibrary>>,
}

impl Default for DynamicLibraryLoader {
    fn default() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl DynamicLibraryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static Self {
        static GLOBAL: Lazy<DynamicLibraryLoader> = Lazy::new(DynamicLibraryLoader::new);
        &GLOBAL
    }

    pub fn load(&self, path: &Path) -> Result<DynamicLibrary> {
        if let Some(existing) = self.cache.lock().get(path).cloned() {
            return Ok(existing);
        }

        let library = unsafe { Library::new(path) }
            .with_context(|| format!("failed to load dynamic library {}", path.display()))?;
        let handle = DynamicLibrary::new(library);
        self.cache.lock().insert(path.to_path_buf(), handle.clone());
        Ok(handle)
    }

    /// Loads `path` and reads the resident module it exports.
    pub fn load_module(&self, path: &Path) -> Result<ResidentModule> {
        let library = self.load(path)?;
        let module = read_module_def(&library)
            .with_context(|| format!("failed to read module from {}", path.display()))?;
        debug!(
            library = %module.library_name,
            wrappers = module.wrapper_count(),
            "read resident module"
        );
        Ok(module)
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.cache.lock().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_an_error() {
        let loader = DynamicLibraryLoader::new();
        let path = Path::new("/nonexistent/libmissing.so");
        assert!(loader.load_module(path).is_err());
        assert!(!loader.is_loaded(path));
    }
}
