//! Configuration for the design-scout query host.

use design_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ScoutError};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "DESIGN_SCOUT_CONFIG";

/// Top-level configuration for the query host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Gallery registry, HTTP client and category cache settings.
    pub search: SearchConfig,
    /// Result-count bounds for query commands.
    pub limits: LimitsConfig,
}

/// Result-count bounds applied to `limit` payload fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Limit used when a command omits `limit`.
    pub default_limit: usize,
    /// Largest accepted `limit`.
    pub max_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            default_limit: 12,
            max_limit: 50,
        }
    }
}

impl ScoutConfig {
    /// Load configuration from [`CONFIG_PATH_ENV`] or the default path.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path);
        Self::load_or_default(&path)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`ScoutConfig::from_file`], plus validation failures.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(path)?
        } else {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ScoutError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ScoutError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/design-scout/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("design-scout").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("design-scout")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/design-scout/config.toml")
        }
    }

    /// Validate search settings and limit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Config`] or the underlying search config error.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        if self.limits.max_limit == 0 {
            return Err(ScoutError::Config(
                "limits.max_limit must be greater than 0".to_owned(),
            ));
        }
        if self.limits.default_limit == 0 || self.limits.default_limit > self.limits.max_limit {
            return Err(ScoutError::Config(format!(
                "limits.default_limit must be between 1 and {}",
                self.limits.max_limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use design_search::ProviderKind;

    #[test]
    fn default_config_is_valid() {
        let config = ScoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.limits.default_limit, 12);
        assert_eq!(config.limits.max_limit, 50);
        assert_eq!(config.search.sources.len(), 6);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ScoutConfig::default();
        config.search.sources = vec![ProviderKind::Godly, ProviderKind::LandBook];
        config.search.timeout_seconds = Some(20);
        config.limits.default_limit = 8;
        config.save_to_file(&path).expect("save");

        let loaded = ScoutConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[search]\nsources = [\"httpster\"]\n\n[search.base_urls]\nhttpster = \"http://127.0.0.1:8080/\"\n",
        )
        .expect("write");

        let config = ScoutConfig::load_or_default(&path).expect("load");
        assert_eq!(config.search.sources, vec![ProviderKind::Httpster]);
        assert_eq!(config.search.category_cache_ttl_seconds, 3600);
        assert_eq!(config.limits, LimitsConfig::default());
        assert_eq!(
            config.search.base_url(ProviderKind::Httpster),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ScoutConfig::load_or_default(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(config, ScoutConfig::default());
    }

    #[test]
    fn invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");
        assert!(matches!(
            ScoutConfig::from_file(&path),
            Err(ScoutError::Config(_))
        ));
    }

    #[test]
    fn unknown_source_slug_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nsources = [\"dribbble\"]\n").expect("write");
        assert!(ScoutConfig::from_file(&path).is_err());
    }

    #[test]
    fn default_limit_above_max_is_rejected() {
        let config = ScoutConfig {
            limits: LimitsConfig {
                default_limit: 60,
                max_limit: 50,
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_limit"));
    }

    #[test]
    fn empty_sources_is_rejected() {
        let mut config = ScoutConfig::default();
        config.search.sources.clear();
        assert!(matches!(config.validate(), Err(ScoutError::Search(_))));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = ScoutConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("design-scout"));
    }
}
