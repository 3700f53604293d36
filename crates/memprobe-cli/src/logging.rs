//! Logging bootstrap
//!
//! Log lines go to stdout next to the transcript, formatted as
//! `<timestamp> <LEVEL> <target>: <message>`.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Directives appended to every filter so HTTP internals stay quiet
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,reqwest=warn";

/// Build the filter from `RUST_LOG`, falling back to `level`
pub fn filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter> {
    let base = rust_log
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(level);

    EnvFilter::try_new(format!("{},{}", base, QUIET_DEPENDENCIES))
        .with_context(|| format!("invalid log filter '{}'", base))
}

/// Install the global subscriber
pub fn init(level: &str) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter(rust_log.as_deref(), level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stdout)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_used_without_rust_log() {
        let filter = filter(None, "debug").unwrap();
        assert!(filter.to_string().contains("debug"));
        assert!(filter.to_string().contains("reqwest=warn"));
    }

    #[test]
    fn test_rust_log_wins() {
        let filter = filter(Some("memprobe_scenario=trace"), "info").unwrap();
        assert!(filter.to_string().contains("memprobe_scenario=trace"));
    }

    #[test]
    fn test_blank_rust_log_ignored() {
        let filter = filter(Some("  "), "warn").unwrap();
        assert!(filter.to_string().contains("warn"));
    }

    #[test]
    fn test_invalid_level_rejected() {
        assert!(filter(None, "memprobe=loud").is_err());
    }
}
