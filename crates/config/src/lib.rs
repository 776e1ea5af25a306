//! Configuration loading and validation.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults.
//! 2. A configuration file (TOML, YAML or JSON by extension), either given
//!    explicitly or `config.toml` in the platform config directory.
//! 3. Environment variables prefixed with `SPRITESCOPE_`, with `__`
//!    separating nested keys (`SPRITESCOPE_DIAGNOSTICS__SIZE_THRESHOLD=0.3`).

pub mod error;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ErrorKind, Result};

pub const DEFAULT_SIZE_THRESHOLD: f32 = 0.25;
pub const DEFAULT_STORAGE_KEY: &str = "spritescope.usage";
pub const ENV_PREFIX: &str = "SPRITESCOPE_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub diagnostics: Diagnostics,
    pub persistence: Persistence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagnostics {
    /// Relative deviation between observed and intrinsic size above which a
    /// sprite is flagged as used bigger or smaller.
    pub size_threshold: f32,
}
impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            size_threshold: DEFAULT_SIZE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persistence {
    /// Settings key the usage blob is stored under.
    pub key: String,
}
impl Default for Persistence {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Config {
    /// Path of the per-user configuration file, if the platform has a config
    /// directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spritescope").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The layered configuration sources, without extracting them.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = match path.extension().and_then(OsStr::to_str) {
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load from the default file location and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path().as_deref())
    }

    /// Load from an explicit file (missing files are skipped) and the
    /// environment.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        debug!(path = ?path, "Loading configuration");
        let config: Self = Self::figment(path).extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.diagnostics.size_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            exn::bail!(ErrorKind::Invalid {
                field: "diagnostics.size_threshold",
                reason: format!("must be a finite, non-negative number (got {threshold})"),
            });
        }
        if self.persistence.key.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid {
                field: "persistence.key",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config = Config::load_from(None).map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            assert_eq!(config.diagnostics.size_threshold, 0.25);
            assert_eq!(config.persistence.key, "spritescope.usage");
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("spritescope.toml", "[diagnostics]\nsize_threshold = 0.4\n")?;
            let config = Config::load_from(Some(Path::new("spritescope.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.diagnostics.size_threshold, 0.4);
            assert_eq!(config.persistence.key, DEFAULT_STORAGE_KEY);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("spritescope.yaml", "diagnostics:\n  size_threshold: 0.4\npersistence:\n  key: from-file\n")?;
            jail.set_env("SPRITESCOPE_DIAGNOSTICS__SIZE_THRESHOLD", "0.6");
            let config = Config::load_from(Some(Path::new("spritescope.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.diagnostics.size_threshold, 0.6);
            assert_eq!(config.persistence.key, "from-file");
            Ok(())
        });
    }

    #[test]
    fn test_json_file_outside_working_directory() {
        Jail::expect_with(|_| {
            let dir = tempfile::tempdir().map_err(|e| e.to_string())?;
            let path = dir.path().join("settings.json");
            std::fs::write(&path, r#"{"persistence":{"key":"project.usage"}}"#).map_err(|e| e.to_string())?;
            let config = Config::load_from(Some(&path)).map_err(|e| e.to_string())?;
            assert_eq!(config.persistence.key, "project.usage");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_skipped() {
        Jail::expect_with(|_| {
            let config = Config::load_from(Some(Path::new("nope.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_malformed_value_fails_to_load() {
        Jail::expect_with(|jail| {
            jail.set_env("SPRITESCOPE_DIAGNOSTICS__SIZE_THRESHOLD", "lots");
            let err = Config::load_from(None).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Load));
            Ok(())
        });
    }

    #[test]
    fn test_negative_threshold_from_env_is_invalid() {
        Jail::expect_with(|jail| {
            jail.set_env("SPRITESCOPE_DIAGNOSTICS__SIZE_THRESHOLD", "-0.1");
            let err = Config::load_from(None).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid { field: "diagnostics.size_threshold", .. }));
            Ok(())
        });
    }

    #[rstest]
    #[case(f32::INFINITY)]
    #[case(f32::NAN)]
    #[case(-1.0)]
    fn test_invalid_threshold(#[case] threshold: f32) {
        let mut config = Config::default();
        config.diagnostics.size_threshold = threshold;
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { field: "diagnostics.size_threshold", .. }));
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.25)]
    #[case(10.0)]
    fn test_valid_threshold(#[case] threshold: f32) {
        let mut config = Config::default();
        config.diagnostics.size_threshold = threshold;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_key_is_invalid() {
        let mut config = Config::default();
        config.persistence.key = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { field: "persistence.key", .. }));
    }
}
