//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use bbd_api::ApiConfig;
use bbd_core::UnitSystem;
use bbd_sync::SyncConfig;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Baby Buddy server, e.g. `https://baby.example.com`.
    pub base_url: String,
    /// API token from the Baby Buddy user settings page.
    pub api_key: String,
    /// Seconds between full-data refreshes in `watch`.
    pub refresh_interval_secs: u64,
    /// Unit labels for rendered measures.
    pub units: UnitSystem,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .field("units", &self.units)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            refresh_interval_secs: 30,
            units: UnitSystem::Metric,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Precedence, lowest to highest: defaults, the config-dir file, the
    /// explicit file, `BBD_`-prefixed environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("BBD_"));

        figment.extract()
    }

    /// API client configuration with this config's credentials.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone(), self.api_key.clone())
    }

    /// Dashboard service configuration.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            ..SyncConfig::default()
        }
    }
}

/// Returns the platform-specific config directory for bbd.
///
/// On Linux: `~/.config/bbd`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("bbd"))
}

/// Path of the default config file.
pub fn config_file_path() -> Option<PathBuf> {
    dirs_config_path().map(|p| p.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_metric_with_30s_refresh() {
        let config = Config::default();
        assert_eq!(config.refresh_interval_secs, 30);
        assert_eq!(config.units, UnitSystem::Metric);
        assert!(config.base_url.is_empty());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = Config {
            api_key: "secret-token".to_string(),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn file_overrides_defaults_and_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            // Keep the host's real config dir out of the merge.
            jail.set_env("XDG_CONFIG_HOME", jail.directory().display().to_string());
            jail.set_env("HOME", jail.directory().display().to_string());

            jail.create_file(
                "config.toml",
                r#"
                    base_url = "https://baby.example.com"
                    api_key = "from-file"
                    refresh_interval_secs = 60
                    units = "imperial"
                "#,
            )?;
            jail.set_env("BBD_API_KEY", "from-env");

            let config = Config::load_from(Some(Path::new("config.toml")))?;
            assert_eq!(config.base_url, "https://baby.example.com");
            assert_eq!(config.api_key, "from-env");
            assert_eq!(config.refresh_interval_secs, 60);
            assert_eq!(config.units, UnitSystem::Imperial);
            Ok(())
        });
    }

    #[test]
    fn sync_config_uses_configured_interval() {
        let config = Config {
            refresh_interval_secs: 5,
            ..Config::default()
        };
        assert_eq!(
            config.sync_config().refresh_interval,
            Duration::from_secs(5)
        );
    }
}
