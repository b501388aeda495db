//! Client configuration, persisted as TOML.
//!
//! Lives at `$XDG_CONFIG_HOME/wellshelf/config.toml` (falling back to
//! `$HOME/.config/wellshelf/config.toml`). A missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or saving configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(wellshelf::config::no_home),
        help("Set HOME or XDG_CONFIG_HOME, or pass an explicit config path.")
    )]
    NoHome,

    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(wellshelf::config::read),
        help("Ensure the config file is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(wellshelf::config::parse),
        help("Check the TOML syntax, or regenerate the file with `wellshelf config init`.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(wellshelf::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Where the catalog service lives and how results are paged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfConfig {
    /// Base URL of the book service, e.g. `http://localhost:8080/api/books`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total items retrievable for one query.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_base_url() -> String {
    "http://localhost:8080/api/books".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_max_results() -> u32 {
    48
}
fn default_page_size() -> u32 {
    16
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_results: default_max_results(),
            page_size: default_page_size(),
        }
    }
}

impl ShelfConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Bound `max_results` to at least 1 and `page_size` to `1..=max_results`.
    pub fn normalized(mut self) -> Self {
        self.max_results = self.max_results.max(1);
        self.page_size = self.page_size.clamp(1, self.max_results);
        self
    }

    /// `$XDG_CONFIG_HOME/wellshelf/config.toml`.
    pub fn default_path() -> ConfigResult<PathBuf> {
        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .map_err(|_| ConfigError::NoHome)?,
        };
        Ok(config_dir.join("wellshelf").join("config.toml"))
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(config.normalized())
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ShelfConfig::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config, ShelfConfig::default());
        assert_eq!(config.max_results, 48);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "page_size = 8\n").unwrap();
        let config = ShelfConfig::load(&path).unwrap();
        assert_eq!(config.page_size, 8);
        assert_eq!(config.base_url, "http://localhost:8080/api/books");
    }

    #[test]
    fn page_size_is_clamped_on_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "max_results = 20\npage_size = 100\n").unwrap();
        assert_eq!(ShelfConfig::load(&path).unwrap().page_size, 20);

        std::fs::write(&path, "page_size = 0\n").unwrap();
        assert_eq!(ShelfConfig::load(&path).unwrap().page_size, 1);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let config = ShelfConfig {
            base_url: "http://books.internal/api/books".into(),
            page_size: 24,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ShelfConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "page_size = \"lots\"").unwrap();
        assert!(matches!(
            ShelfConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
