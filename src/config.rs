//! Process configuration, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `LOG_LEVEL` | `info` | Fallback filter when `RUST_LOG` is unset |
//! | `DEBUG` | `false` | Extra startup diagnostics |
//! | `PGDATASOURCE` | `postgres://localhost/frontend` | Persistence handle DSN |
//! | `METRICS_NAMESPACE` | `frontend` | Namespace for host-level instrumentation |
//! | `SITE_CONFIG` | `{}` | JSON site configuration, see [`SiteConfig`] |

use serde::Deserialize;
use std::env;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a boolean, got {value:?}")]
    InvalidBool { key: &'static str, value: String },
    #[error("SITE_CONFIG is not valid JSON: {0}")]
    InvalidSiteConfig(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub debug: bool,
    pub database_url: String,
    pub metrics_namespace: String,
    pub site: SiteConfig,
}

/// The watchable part of the configuration. Modules read it through
/// [`WatchableConfig`](crate::dependencies::WatchableConfig).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// `<plan>:<max users>`, e.g. `enterprise:250`.
    pub license_key: Option<String>,
    pub insights_enabled: bool,
    pub dotcom_mode: bool,
    pub executors_access_token: Option<String>,
    pub executor_max_queue_size: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let site = match lookup("SITE_CONFIG") {
            Some(raw) => serde_json::from_str(&raw)?,
            None => SiteConfig::default(),
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            debug: parse_bool("DEBUG", lookup("DEBUG"))?,
            database_url: lookup("PGDATASOURCE")
                .unwrap_or_else(|| "postgres://localhost/frontend".to_string()),
            metrics_namespace: lookup("METRICS_NAMESPACE")
                .unwrap_or_else(|| "frontend".to_string()),
            site,
        })
    }
}

fn parse_bool(key: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref() {
        None | Some("") => Ok(false),
        Some("1") | Some("true") | Some("TRUE") | Some("True") => Ok(true),
        Some("0") | Some("false") | Some("FALSE") | Some("False") => Ok(false),
        Some(other) => Err(ConfigError::InvalidBool {
            key,
            value: other.to_string(),
        }),
    }
}
