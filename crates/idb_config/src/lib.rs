//! Loader configuration
//!
//! Where the database artifacts are looked for. Directories added explicitly
//! are searched first, in the order they were added, then every entry of the
//! search path strings in the order they appear, then the current directory.
//! The first existing file wins.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Search path string, split like `PATH`.
pub const PATH_ENV: &str = "INTERROGATE_PATH";

/// Extra search directories, same format as [`PATH_ENV`], searched before it.
pub const DIRS_ENV: &str = "INTERROGATE_DIRS";

/// Artifact search configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Directories, highest priority first
    pub directories: Vec<PathBuf>,

    /// Delimited search path strings, searched after `directories`
    pub path_strings: Vec<String>,

    /// Fall back to the current directory
    pub include_current_dir: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            path_strings: Vec::new(),
            include_current_dir: true,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var(DIRS_ENV) {
            config.directories.extend(split_search_path(&val));
        }

        if let Ok(val) = std::env::var(PATH_ENV) {
            config.path_strings.push(val);
        }

        config
    }

    pub fn add_directory(&mut self, dir: impl Into<PathBuf>) {
        self.directories.push(dir.into());
    }

    pub fn add_path_string(&mut self, path: impl Into<String>) {
        self.path_strings.push(path.into());
    }

    /// Appends `other`'s entries after everything already configured. The
    /// current-directory fallback stays as `self` has it.
    pub fn merge(&mut self, other: Self) {
        self.directories.extend(other.directories);
        self.path_strings.extend(other.path_strings);
    }

    /// Every directory to search, in priority order, without repeats.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        let candidates = self
            .directories
            .iter()
            .cloned()
            .chain(self.path_strings.iter().flat_map(|path| split_search_path(path)))
            .chain(
                self.include_current_dir
                    .then(|| PathBuf::from("."))
                    .into_iter(),
            );

        for dir in candidates {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    /// Locates `filename`; absolute names are used as they are.
    pub fn find(&self, filename: &str) -> Option<PathBuf> {
        let requested = Path::new(filename);
        if requested.is_absolute() {
            return requested.is_file().then(|| requested.to_path_buf());
        }

        self.search_dirs().into_iter().find_map(|dir| {
            let candidate = dir.join(requested);
            debug!(candidate = %candidate.display(), "probing for database file");
            candidate.is_file().then_some(candidate)
        })
    }
}

/// Splits an OS-style search path (`:` on Unix, `;` on Windows), skipping
/// empty entries.
pub fn split_search_path(path: &str) -> impl Iterator<Item = PathBuf> + '_ {
    std::env::split_paths(path).filter(|entry| !entry.as_os_str().is_empty())
}

/// Complete loader configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Artifact search configuration
    pub search: SearchConfig,
}

impl LoaderConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            search: SearchConfig::from_env(),
        }
    }

    /// Load configuration from TOML file
    #[cfg(feature = "toml-config")]
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: LoaderConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from TOML file (stub when toml feature is disabled)
    #[cfg(not(feature = "toml-config"))]
    pub fn from_file(_path: &Path) -> anyhow::Result<Self> {
        anyhow::bail!("TOML support not enabled. Enable the 'toml-config' feature.")
    }

    /// Merge with environment variables (env entries are searched after
    /// the file's own)
    pub fn merge_with_env(mut self) -> Self {
        self.search.merge(SearchConfig::from_env());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(unix)]
    #[test]
    fn test_split_search_path_skips_empty_entries() {
        let dirs: Vec<PathBuf> = split_search_path("/a::/b:").collect();
        assert_eq!(dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_directories_precede_path_strings() {
        let mut config = SearchConfig::new();
        config.add_path_string("/from/path:/shared");
        config.add_directory("/first");
        config.add_directory("/shared");

        assert_eq!(
            config.search_dirs(),
            vec![
                PathBuf::from("/first"),
                PathBuf::from("/shared"),
                PathBuf::from("/from/path"),
                PathBuf::from("."),
            ]
        );
    }

    #[test]
    fn test_first_match_wins() {
        let high = tempfile::tempdir().unwrap();
        let low = tempfile::tempdir().unwrap();
        fs::write(high.path().join("core.in"), "{}").unwrap();
        fs::write(low.path().join("core.in"), "{}").unwrap();
        fs::write(low.path().join("extra.in"), "{}").unwrap();

        let mut config = SearchConfig::new();
        config.add_directory(high.path());
        config.add_directory(low.path());

        assert_eq!(config.find("core.in"), Some(high.path().join("core.in")));
        assert_eq!(config.find("extra.in"), Some(low.path().join("extra.in")));
        assert_eq!(config.find("missing.in"), None);
    }

    #[test]
    fn test_absolute_names_bypass_search() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("abs.in");
        fs::write(&file, "{}").unwrap();

        let config = SearchConfig {
            include_current_dir: false,
            ..SearchConfig::default()
        };
        assert_eq!(config.find(file.to_str().unwrap()), Some(file.clone()));
    }

    #[test]
    fn test_merge_keeps_current_dir_opt_out() {
        let mut config = SearchConfig {
            directories: vec![PathBuf::from("/from/file")],
            include_current_dir: false,
            ..SearchConfig::default()
        };
        config.merge(SearchConfig {
            directories: vec![PathBuf::from("/from/env")],
            ..SearchConfig::default()
        });

        assert!(!config.include_current_dir);
        assert_eq!(
            config.search_dirs(),
            vec![PathBuf::from("/from/file"), PathBuf::from("/from/env")]
        );

        let loader = LoaderConfig {
            search: SearchConfig {
                include_current_dir: false,
                ..SearchConfig::default()
            },
        }
        .merge_with_env();
        assert!(!loader.search.include_current_dir);
        assert!(!loader.search.search_dirs().contains(&PathBuf::from(".")));
    }

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();
        assert!(config.search.include_current_dir);
        assert!(config.search.directories.is_empty());
    }
}
