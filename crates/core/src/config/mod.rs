//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WEBMENTION_*)
//! 2. TOML config file (if WEBMENTION_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WEBMENTION_*)
/// 2. TOML config file (if WEBMENTION_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for discovery fetches and webmention posts.
    ///
    /// Set via WEBMENTION_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via WEBMENTION_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Redirects followed by discovery fetches. Posts never follow redirects.
    ///
    /// Set via WEBMENTION_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Response bodies larger than this are dropped before parsing.
    ///
    /// Set via WEBMENTION_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Upper bound on endpoint cache entries.
    ///
    /// Set via WEBMENTION_CACHE_MAX_ENTRIES environment variable.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: u64,

    /// Endpoint cache time-to-live in seconds.
    ///
    /// Set via WEBMENTION_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Whether discovery consults and fills the endpoint cache by default.
    #[serde(default = "default_true")]
    pub use_cache: bool,

    /// Whether discovery follows one HTML meta refresh by default.
    #[serde(default)]
    pub follow_meta_refresh: bool,
}

fn default_user_agent() -> String {
    "webmention-client/0.1".into()
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_max_redirects() -> usize {
    30
}

fn default_max_bytes() -> usize {
    2_000_000
}

fn default_cache_max_entries() -> u64 {
    100_000
}

fn default_cache_ttl_secs() -> u64 {
    365 * 24 * 60 * 60
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_bytes: default_max_bytes(),
            cache_max_entries: default_cache_max_entries(),
            cache_ttl_secs: default_cache_ttl_secs(),
            use_cache: true,
            follow_meta_refresh: false,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Endpoint cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WEBMENTION_`
    /// 2. TOML file from `WEBMENTION_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WEBMENTION_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WEBMENTION_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.user_agent, "webmention-client/0.1");
        assert_eq!(config.timeout_ms, 15_000);
        assert_eq!(config.max_redirects, 30);
        assert_eq!(config.max_bytes, 2_000_000);
        assert_eq!(config.cache_max_entries, 100_000);
        assert_eq!(config.cache_ttl_secs, 31_536_000);
        assert!(config.use_cache);
        assert!(!config.follow_meta_refresh);
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(15_000));
        assert_eq!(config.cache_ttl(), Duration::from_secs(365 * 24 * 60 * 60));
    }

    #[test]
    fn test_load_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("WEBMENTION_TIMEOUT_MS", "5000");
            jail.set_env("WEBMENTION_FOLLOW_META_REFRESH", "true");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.timeout_ms, 5000);
            assert!(config.follow_meta_refresh);
            assert_eq!(config.user_agent, "webmention-client/0.1");
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file_then_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "webmention.toml",
                r#"
                    user_agent = "my-blog/2.0"
                    cache_max_entries = 50
                "#,
            )?;
            jail.set_env("WEBMENTION_CONFIG_FILE", "webmention.toml");
            jail.set_env("WEBMENTION_CACHE_MAX_ENTRIES", "75");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.user_agent, "my-blog/2.0");
            assert_eq!(config.cache_max_entries, 75);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("WEBMENTION_TIMEOUT_MS", "10");

            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
            Ok(())
        });
    }
}
