//! Command-line arguments

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use memprobe_core::{ProbeConfig, TurnKind};
use memprobe_scenario::COMPREHENSIVE;
use std::path::PathBuf;

/// Probe a conversation memory service over HTTP
#[derive(Debug, Parser)]
#[command(name = "memprobe", author, version, about, long_about = None)]
pub struct Cli {
    /// RON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Memory service base URL (overrides config and MEMPROBE_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Multiplier for scenario pauses (0 disables them)
    #[arg(long, global = true)]
    pub wait_scale: Option<f64>,

    /// Log level used when RUST_LOG is not set
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the service reports itself healthy
    Health,

    /// Run a built-in or RON-defined scenario
    Run {
        /// Built-in scenario name
        #[arg(default_value = COMPREHENSIVE, conflicts_with = "scenario")]
        name: String,

        /// Load the scenario from a RON file instead
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Reuse an existing user id instead of generating one
        #[arg(long)]
        user_id: Option<String>,

        /// Reuse an existing conversation id instead of generating one
        #[arg(long)]
        conversation_id: Option<String>,
    },

    /// Post a single conversation turn
    Add {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        conversation_id: String,

        /// Speaker: human or ai
        #[arg(short, long, default_value = "human")]
        kind: TurnKind,

        #[arg(short, long)]
        text: String,
    },

    /// Retrieve memories for a query
    Retrieve {
        #[arg(long)]
        user_id: String,

        #[arg(short, long)]
        query: String,
    },

    /// List built-in scenarios or print one as RON
    Scenarios {
        /// Scenario to print
        #[arg(long)]
        show: Option<String>,
    },
}

impl Cli {
    /// Defaults, then config file, then environment, then flags
    pub fn resolve_config(&self) -> Result<ProbeConfig> {
        let mut config = match &self.config {
            Some(path) => ProbeConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ProbeConfig::default(),
        };

        config
            .apply_env()
            .context("invalid MEMPROBE_* environment override")?;

        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(scale) = self.wait_scale {
            config.wait_scale = scale;
        }

        config.validate().context("invalid command-line option")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults_to_comprehensive() {
        let cli = Cli::try_parse_from(["memprobe", "run"]).unwrap();
        match cli.command {
            Commands::Run { name, scenario, .. } => {
                assert_eq!(name, "comprehensive");
                assert!(scenario.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "memprobe",
            "run",
            "evolution",
            "--base-url",
            "http://10.1.1.1:8182",
            "--wait-scale",
            "0",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://10.1.1.1:8182"));
        assert_eq!(cli.wait_scale, Some(0.0));
        assert!(matches!(cli.command, Commands::Run { ref name, .. } if name == "evolution"));
    }

    #[test]
    fn test_add_parses_kind() {
        let cli = Cli::try_parse_from([
            "memprobe",
            "add",
            "--user-id",
            "u1",
            "--conversation-id",
            "c1",
            "--kind",
            "ai",
            "--text",
            "Noted.",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { kind, text, .. } => {
                assert_eq!(kind, TurnKind::Ai);
                assert_eq!(text, "Noted.");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_add_rejects_unknown_kind() {
        let result = Cli::try_parse_from([
            "memprobe",
            "add",
            "--user-id",
            "u1",
            "--conversation-id",
            "c1",
            "--kind",
            "robot",
            "--text",
            "beep",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_name_conflicts_with_scenario_file() {
        let result = Cli::try_parse_from(["memprobe", "run", "evolution", "--scenario", "x.ron"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "memprobe",
            "--timeout-secs",
            "15",
            "--base-url",
            "http://memory:8182",
            "health",
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.base_url, "http://memory:8182");
        assert_eq!(config.display_limit, 3);
    }

    #[test]
    fn test_negative_wait_scale_rejected() {
        let cli = Cli::try_parse_from(["memprobe", "--wait-scale=-2", "health"]).unwrap();
        assert!(cli.resolve_config().is_err());
    }
}
