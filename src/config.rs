use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::keys::VirtualKey;
use crate::overlay::CoveragePolicy;

/// Optional settings read from JSON. Never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Key name that ends the blackout, e.g. "Escape" or "F12"
    pub exit_key: String,
    pub coverage: CoveragePolicy,
    /// Default tracing filter when RUST_LOG is not set
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exit_key: "Escape".into(),
            coverage: CoveragePolicy::BestEffort,
            log_level: "info".into(),
        }
    }
}

impl AppConfig {
    /// Resolved exit key. Unknown names fall back to Escape.
    pub fn exit_key(&self) -> VirtualKey {
        VirtualKey::from_name(&self.exit_key).unwrap_or_else(|| {
            warn!(name = %self.exit_key, "unknown exit key, using Escape");
            VirtualKey::ESCAPE
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("FakeShutdown").join("config.json")
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_path())
}

/// A missing file is not an error: it yields the defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fakeshutdown-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("fakeshutdown-does-not-exist.json");
        assert_eq!(load_config_from(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = scratch_file("partial.json", r#"{ "exit_key": "F12" }"#);
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.exit_key, "F12");
        assert_eq!(cfg.coverage, CoveragePolicy::BestEffort);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.exit_key(), VirtualKey(0x7B));
    }

    #[test]
    fn full_file_is_honoured() {
        let path = scratch_file(
            "full.json",
            r#"{ "exit_key": "pause", "coverage": "require_all", "log_level": "debug" }"#,
        );
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.exit_key(), VirtualKey::PAUSE);
        assert_eq!(cfg.coverage, CoveragePolicy::RequireAll);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = scratch_file("broken.json", "{ exit_key: ");
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn directory_path_is_an_io_error() {
        let dir = std::env::temp_dir();
        assert!(matches!(load_config_from(&dir), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn unknown_exit_key_falls_back_to_escape() {
        let cfg = AppConfig { exit_key: "Hyper".into(), ..AppConfig::default() };
        assert_eq!(cfg.exit_key(), VirtualKey::ESCAPE);
    }

    #[test]
    fn config_path_ends_with_app_folder() {
        assert!(config_path().ends_with("FakeShutdown/config.json"));
    }
}
