//! Configuration management and validation.
//!
//! Provides the lookup configuration (where resources come from, how
//! fetches are retried, how the status badge is styled) and its layered
//! loading: built-in defaults, then a TOML file, then `TRAFO_LOOKUP_*`
//! environment variables.

use crate::constants::{
    BADGE_DANGER_CLASS, BADGE_SUCCESS_CLASS, CONFIG_FILE_NAME, DEFAULT_SOURCE_ROOT, ENV_PREFIX,
    FOLLOW_UP_SENTINEL,
};
use crate::error::{LookupError, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Bounded retry policy for resource fetches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts per fetch, including the first (1 = no retry)
    pub max_attempts: u32,

    /// Delay before each retry, multiplied by the retry number
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 250,
        }
    }
}

impl RetryPolicy {
    pub fn delay_before(&self, retry: u32) -> Duration {
        Duration::from_millis(self.backoff_ms.saturating_mul(u64::from(retry)))
    }
}

/// Two-way badge styling: `{sentinel: matched_class, anything_else: other_class}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeRules {
    /// Exact status value that selects `matched_class`
    pub sentinel: String,
    pub matched_class: String,
    pub other_class: String,
}

impl Default for BadgeRules {
    fn default() -> Self {
        Self {
            sentinel: FOLLOW_UP_SENTINEL.to_string(),
            matched_class: BADGE_DANGER_CLASS.to_string(),
            other_class: BADGE_SUCCESS_CLASS.to_string(),
        }
    }
}

impl BadgeRules {
    /// Style class for a raw status value (exact, case-sensitive comparison)
    pub fn class_for(&self, status: Option<&str>) -> &str {
        if status == Some(self.sentinel.as_str()) {
            &self.matched_class
        } else {
            &self.other_class
        }
    }

    pub fn is_sentinel(&self, status: Option<&str>) -> bool {
        status == Some(self.sentinel.as_str())
    }
}

/// Global configuration for the lookup client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Root of the static resources: an `http(s)://` URL or a directory
    pub source_root: String,

    /// Per-request timeout in seconds (none by default)
    pub request_timeout_secs: Option<u64>,

    /// Retry policy for index and detail fetches
    pub retry: RetryPolicy,

    /// Status badge styling
    pub badge: BadgeRules,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            source_root: DEFAULT_SOURCE_ROOT.to_string(),
            request_timeout_secs: None,
            retry: RetryPolicy::default(),
            badge: BadgeRules::default(),
        }
    }
}

impl LookupConfig {
    /// Load configuration: defaults, then TOML file, then environment.
    ///
    /// An explicitly given `path` must exist. Without one, the file in the
    /// user config directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(LookupConfig::default()));

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(LookupError::configuration(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(default_path) = Self::default_path() {
                    debug!("Looking for config at {}", default_path.display());
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        let config: LookupConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// `<user config dir>/trafo-lookup.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_root.trim().is_empty() {
            return Err(LookupError::configuration("source_root must not be empty"));
        }
        if self.retry.max_attempts == 0 {
            return Err(LookupError::configuration(
                "retry.max_attempts must be at least 1",
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(LookupError::configuration(
                "request_timeout_secs must be positive when set",
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Override the source root
    pub fn with_source_root(mut self, root: impl Into<String>) -> Self {
        self.source_root = root.into();
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the badge styling rules
    pub fn with_badge_rules(mut self, badge: BadgeRules) -> Self {
        self.badge = badge;
        self
    }
}
