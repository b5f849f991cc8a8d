//! Configuration file handling.
//!
//! Loads shared defaults from `~/.config/portrait-kit/config.toml`.
//! Command-line flags always win over the file; a missing file simply
//! yields the built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Configuration file structure shared by both tools.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Filesystem locations used by the capture and upload tools.
#[derive(Debug, Deserialize, Default)]
pub struct PathsConfig {
    /// Directory all datasets are saved to.
    pub datasets_location: Option<PathBuf>,
    /// Directory staged datasets are written to for upload.
    pub upload_location: Option<PathBuf>,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    /// Load configuration from a file path, or the default location when
    /// `None`. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Resolve the datasets location: CLI override, then config file, then
    /// the built-in default.
    pub fn resolve_datasets_location(&self, override_path: Option<PathBuf>) -> PathBuf {
        override_path
            .or_else(|| self.paths.datasets_location.clone())
            .unwrap_or_else(default_datasets_location)
    }

    /// Resolve the upload location: CLI override, then config file. There
    /// is no built-in default; staging somewhere surprising would hand the
    /// sync agent the wrong tree.
    pub fn resolve_upload_location(&self, override_path: Option<PathBuf>) -> Option<PathBuf> {
        override_path.or_else(|| self.paths.upload_location.clone())
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("portrait-kit")
        .join("config.toml")
}

/// Built-in datasets location. Intended to be overridden with a path on
/// bulk storage.
pub fn default_datasets_location() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("datasets")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/config.toml"))).unwrap();
        assert!(config.paths.datasets_location.is_none());
        assert!(config.paths.upload_location.is_none());
    }

    #[test]
    fn test_load_parses_paths_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[paths]\ndatasets_location = \"/mnt/storage/datasets\"\nupload_location = \"/mnt/storage/uploads\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(
            config.paths.datasets_location,
            Some(PathBuf::from("/mnt/storage/datasets"))
        );
        assert_eq!(
            config.paths.upload_location,
            Some(PathBuf::from("/mnt/storage/uploads"))
        );
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [").unwrap();

        let result = Config::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_resolve_datasets_location_prefers_cli() {
        let config = Config {
            paths: PathsConfig {
                datasets_location: Some(PathBuf::from("/from/config")),
                upload_location: None,
            },
        };
        assert_eq!(
            config.resolve_datasets_location(Some(PathBuf::from("/from/cli"))),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            config.resolve_datasets_location(None),
            PathBuf::from("/from/config")
        );
    }

    #[test]
    fn test_resolve_datasets_location_falls_back_to_default() {
        let config = Config::default();
        assert_eq!(
            config.resolve_datasets_location(None),
            default_datasets_location()
        );
    }

    #[test]
    fn test_resolve_upload_location_has_no_builtin_default() {
        let config = Config::default();
        assert!(config.resolve_upload_location(None).is_none());
    }
}
