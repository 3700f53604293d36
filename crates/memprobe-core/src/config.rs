//! RON configuration for probe runs

use crate::error::ConfigError;
use crate::session::{DEFAULT_CONVERSATION_PREFIX, DEFAULT_USER_PREFIX};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const ENV_BASE_URL: &str = "MEMPROBE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MEMPROBE_TIMEOUT_SECS";

/// Largest accepted pause multiplier
pub const MAX_WAIT_SCALE: f64 = 100.0;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Memory service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Prefix for generated user ids
    #[serde(default = "default_user_prefix")]
    pub user_prefix: String,
    /// Prefix for generated conversation ids
    #[serde(default = "default_conversation_prefix")]
    pub conversation_prefix: String,
    /// Memories shown per retrieval
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
    /// Characters of memory content shown before truncation
    #[serde(default = "default_content_preview_chars")]
    pub content_preview_chars: usize,
    /// Multiplier for scenario pauses; 0 disables them
    #[serde(default = "default_wait_scale")]
    pub wait_scale: f64,
}

fn default_base_url() -> String {
    "http://localhost:8182".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_user_prefix() -> String {
    DEFAULT_USER_PREFIX.to_string()
}

fn default_conversation_prefix() -> String {
    DEFAULT_CONVERSATION_PREFIX.to_string()
}

fn default_display_limit() -> usize {
    3
}

fn default_content_preview_chars() -> usize {
    100
}

fn default_wait_scale() -> f64 {
    1.0
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_prefix: default_user_prefix(),
            conversation_prefix: default_conversation_prefix(),
            display_limit: default_display_limit(),
            content_preview_chars: default_content_preview_chars(),
            wait_scale: default_wait_scale(),
        }
    }
}

impl ProbeConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_ron(&content)
    }

    /// Parse configuration from RON text
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: ProbeConfig =
            ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MEMPROBE_*` environment overrides
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("{} must be an integer, got '{}'", ENV_TIMEOUT_SECS, raw))
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("base_url must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation("timeout_secs must be positive".to_string()));
        }
        if !(0.0..=MAX_WAIT_SCALE).contains(&self.wait_scale) {
            return Err(ConfigError::Validation(format!(
                "wait_scale must be between 0 and {}, got {}",
                MAX_WAIT_SCALE, self.wait_scale
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_ron_uses_defaults() {
        let config = ProbeConfig::from_ron("()").unwrap();
        assert_eq!(config, ProbeConfig::default());
        assert_eq!(config.base_url, "http://localhost:8182");
        assert_eq!(config.timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_partial_ron() {
        let config = ProbeConfig::from_ron(
            r#"(
                base_url: "http://memory.internal:9000",
                display_limit: 5,
                wait_scale: 0.0,
            )"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://memory.internal:9000");
        assert_eq!(config.display_limit, 5);
        assert_eq!(config.wait_scale, 0.0);
        assert_eq!(config.content_preview_chars, 100);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ProbeConfig::from_ron("(timeout_secs: 0)"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            ProbeConfig::from_ron("(wait_scale: -1.0)"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            ProbeConfig::from_ron("(wait_scale: 1e20)"),
            Err(ConfigError::Validation(_))
        ));
        assert!(ProbeConfig::from_ron("(wait_scale: 100.0)").is_ok());
        assert!(matches!(
            ProbeConfig::from_ron("(base_url: 42)"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://10.0.0.5:8182"),
            (ENV_TIMEOUT_SECS, " 30 "),
        ]
        .into_iter()
        .collect();

        let mut config = ProbeConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url, "http://10.0.0.5:8182");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut config = ProbeConfig::default();
        let result = config.apply_overrides(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ProbeConfig::load("/nonexistent/memprobe.ron");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
