//! Sequential scenario execution against a live service

use crate::error::Result;
use crate::render::{self, DisplayOptions};
use crate::scenario::{Scenario, Step, TurnScript};
use memprobe_core::{ClientError, ConversationTurn, MemoryClient, ProbeConfig, SessionIds};
use std::io::Write;
use std::time::Duration;

/// Display and pacing settings for a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub display: DisplayOptions,
    /// Multiplier applied to every pause
    pub wait_scale: f64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            display: DisplayOptions::default(),
            wait_scale: 1.0,
        }
    }
}

impl RunOptions {
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            display: DisplayOptions {
                limit: config.display_limit,
                preview_chars: config.content_preview_chars,
            },
            wait_scale: config.wait_scale,
        }
    }

    /// Pause length after scaling; saturates instead of overflowing
    fn scaled(&self, millis: u64) -> Duration {
        if !(self.wait_scale > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(millis as f64 / 1000.0 * self.wait_scale)
            .unwrap_or(Duration::MAX)
    }
}

/// Outcome of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    Failed(String),
    /// Not run because an earlier health check failed
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// 1-based position in the scenario
    pub index: usize,
    pub label: String,
    pub status: StepStatus,
}

/// Per-step results of a scenario run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub scenario: String,
    pub session: SessionIds,
    pub steps: Vec<StepRecord>,
}

impl Report {
    fn count(&self, pred: impl Fn(&StepStatus) -> bool) -> usize {
        self.steps.iter().filter(|s| pred(&s.status)).count()
    }

    pub fn passed(&self) -> usize {
        self.count(|s| *s == StepStatus::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| *s == StepStatus::Skipped)
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|s| matches!(s.status, StepStatus::Failed(_)))
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} passed, {} failed, {} skipped",
            self.scenario,
            self.passed(),
            self.failed(),
            self.skipped()
        )
    }
}

/// Executes scenarios for one session, writing a transcript to `out`
pub struct Runner<W: Write> {
    client: MemoryClient,
    session: SessionIds,
    options: RunOptions,
    out: W,
}

impl<W: Write> Runner<W> {
    pub fn new(client: MemoryClient, session: SessionIds, options: RunOptions, out: W) -> Self {
        Self {
            client,
            session,
            options,
            out,
        }
    }

    pub fn session(&self) -> &SessionIds {
        &self.session
    }

    /// Give back the transcript sink
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run every step in order
    ///
    /// Step failures are recorded in the report. Only a failure to write the
    /// transcript is returned as an error.
    pub async fn run(&mut self, scenario: &Scenario) -> Result<Report> {
        tracing::info!(
            scenario = %scenario.name,
            user_id = %self.session.user_id,
            conversation_id = %self.session.conversation_id,
            steps = scenario.steps.len(),
            "starting scenario"
        );

        let mut records = Vec::with_capacity(scenario.steps.len());
        let mut aborted = false;

        for (i, step) in scenario.steps.iter().enumerate() {
            let label = step.label();

            let status = if aborted {
                StepStatus::Skipped
            } else {
                tracing::info!(step = i + 1, label = %label, "running step");
                let status = self.run_step(step).await?;
                if let StepStatus::Failed(reason) = &status {
                    tracing::warn!(step = i + 1, label = %label, reason = %reason, "step failed");
                    if matches!(step, Step::CheckHealth) {
                        writeln!(self.out, "Health check failed, aborting tests")?;
                        aborted = true;
                    }
                }
                status
            };

            records.push(StepRecord {
                index: i + 1,
                label,
                status,
            });
        }

        self.out.flush()?;

        let report = Report {
            scenario: scenario.name.clone(),
            session: self.session.clone(),
            steps: records,
        };
        tracing::info!(summary = %report.summary_line(), "scenario finished");
        Ok(report)
    }

    async fn run_step(&mut self, step: &Step) -> Result<StepStatus> {
        match step {
            Step::CheckHealth => self.check_health().await,
            Step::AddTurns {
                conversation_suffix,
                turns,
                strict,
                quiet,
            } => {
                let conversation_id = match conversation_suffix {
                    Some(suffix) => self.session.derived_conversation(suffix),
                    None => self.session.conversation_id.clone(),
                };
                self.add_turns(&conversation_id, turns, *strict, *quiet).await
            }
            Step::Retrieve { query } => self.retrieve(query).await,
            Step::Pause { millis, note } => {
                if let Some(note) = note {
                    writeln!(self.out, "\n{}", note)?;
                    self.out.flush()?;
                }
                let delay = self.options.scaled(*millis);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(StepStatus::Passed)
            }
            Step::Heading(text) => {
                writeln!(self.out, "\n{}", text)?;
                Ok(StepStatus::Passed)
            }
        }
    }

    async fn check_health(&mut self) -> Result<StepStatus> {
        render::write_section(&mut self.out, "Testing Health Check")?;

        match self.client.health().await {
            Ok(health) => {
                render::write_health(&mut self.out, &health)?;
                if health.is_healthy() {
                    Ok(StepStatus::Passed)
                } else {
                    Ok(StepStatus::Failed(format!(
                        "service reported status '{}'",
                        health.status
                    )))
                }
            }
            Err(ClientError::Status { status, body }) => {
                writeln!(self.out, "Status Code: {}", status)?;
                writeln!(self.out, "Response: {}", body)?;
                Ok(StepStatus::Failed(format!("HTTP {}", status)))
            }
            Err(e) => {
                writeln!(self.out, "Error: {}", e)?;
                Ok(StepStatus::Failed(e.to_string()))
            }
        }
    }

    async fn add_turns(
        &mut self,
        conversation_id: &str,
        turns: &[TurnScript],
        strict: bool,
        quiet: bool,
    ) -> Result<StepStatus> {
        if !quiet {
            render::write_section(&mut self.out, "Adding Test Conversation")?;
        }

        let total = turns.len();
        let mut rejected = Vec::new();

        for (i, script) in turns.iter().enumerate() {
            if !quiet {
                writeln!(self.out, "Adding message {}/{}...", i + 1, total)?;
                self.out.flush()?;
            }

            let turn = ConversationTurn::now(
                &self.session.user_id,
                conversation_id,
                script.kind,
                &script.text,
            );

            match self.client.add_turn(&turn).await {
                Ok(record) => {
                    tracing::debug!(turn = i + 1, %record, "turn stored");
                }
                Err(e) => {
                    match &e {
                        ClientError::Status { status, body } => {
                            writeln!(self.out, "Error adding message: {}", status)?;
                            writeln!(self.out, "Response: {}", body)?;
                        }
                        other => writeln!(self.out, "Error adding message: {}", other)?,
                    }
                    rejected.push(format!("turn {}/{}: {}", i + 1, total, e));
                    if strict {
                        break;
                    }
                }
            }
        }

        if rejected.is_empty() {
            if !quiet {
                writeln!(self.out, "All messages added successfully!")?;
            }
            Ok(StepStatus::Passed)
        } else {
            Ok(StepStatus::Failed(rejected.join("; ")))
        }
    }

    async fn retrieve(&mut self, query: &str) -> Result<StepStatus> {
        render::write_section(
            &mut self.out,
            &format!("Testing Memory Retrieval for '{}'", query),
        )?;

        match self
            .client
            .retrieve_memory(&self.session.user_id, query)
            .await
        {
            Ok(retrieval) => {
                writeln!(self.out, "Status Code: 200")?;
                render::write_retrieval(&mut self.out, &retrieval, &self.options.display)?;
                Ok(StepStatus::Passed)
            }
            Err(ClientError::Status { status, body }) => {
                writeln!(self.out, "Status Code: {}", status)?;
                writeln!(self.out, "Error retrieving memory: {}", body)?;
                Ok(StepStatus::Failed(format!("HTTP {}", status)))
            }
            Err(e) => {
                writeln!(self.out, "Error retrieving memory: {}", e)?;
                Ok(StepStatus::Failed(e.to_string()))
            }
        }
    }
}
