//! memprobe-scenario - Scripted probes against a conversation memory service
//!
//! - **Scenario**: RON-loadable step lists plus the built-in
//!   `comprehensive` and `evolution` scenarios
//! - **Runner**: executes steps in order with scaled pauses and collects a
//!   per-step [`Report`]
//! - **Render**: the plain-text transcript written while a scenario runs
//!
//! # Example
//!
//! ```rust,ignore
//! use memprobe_core::{MemoryClient, ProbeConfig, SessionIds};
//! use memprobe_scenario::{RunOptions, Runner, Scenario};
//!
//! let config = ProbeConfig::default();
//! let client = MemoryClient::new(&config.base_url, config.timeout())?;
//! let mut runner = Runner::new(
//!     client,
//!     SessionIds::default(),
//!     RunOptions::from_config(&config),
//!     std::io::stdout(),
//! );
//! let report = runner.run(&Scenario::comprehensive()).await?;
//! println!("{}", report.summary_line());
//! ```

mod error;
pub mod render;
mod runner;
mod scenario;

pub use error::{Error, Result};
pub use render::DisplayOptions;
pub use runner::{Report, RunOptions, Runner, StepRecord, StepStatus};
pub use scenario::{Scenario, Step, TurnScript, COMPREHENSIVE, EVOLUTION};
