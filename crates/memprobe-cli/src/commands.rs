//! Subcommand implementations
//!
//! Every command writes its transcript to the given sink and reports an
//! [`Outcome`]; `main` maps that onto the process exit code.

use anyhow::{Context, Result};
use memprobe_core::{
    ClientError, ConversationTurn, MemoryClient, ProbeConfig, SessionIds, TurnKind,
};
use memprobe_scenario::render::{self, DisplayOptions};
use memprobe_scenario::{RunOptions, Runner, Scenario, StepStatus};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

/// Whether a command's checks held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    fn from_bool(ok: bool) -> Self {
        if ok {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

fn client(config: &ProbeConfig) -> Result<MemoryClient> {
    MemoryClient::new(&config.base_url, config.timeout())
        .with_context(|| format!("cannot create client for {}", config.base_url))
}

fn display(config: &ProbeConfig) -> DisplayOptions {
    RunOptions::from_config(config).display
}

pub async fn health<W: Write>(config: &ProbeConfig, out: &mut W) -> Result<Outcome> {
    let client = client(config)?;
    render::write_section(out, "Testing Health Check")?;

    let outcome = match client.health().await {
        Ok(status) => {
            render::write_health(out, &status)?;
            if !status.is_healthy() {
                tracing::warn!(status = %status.status, "service is not healthy");
            }
            Outcome::from_bool(status.is_healthy())
        }
        Err(ClientError::Status { status, body }) => {
            writeln!(out, "Status Code: {}", status)?;
            writeln!(out, "Response: {}", body)?;
            tracing::warn!(status, "health check rejected");
            Outcome::Failure
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("health check against {} failed", client.base_url()));
        }
    };
    out.flush()?;
    Ok(outcome)
}

pub struct RunArgs<'a> {
    pub name: &'a str,
    pub scenario: Option<&'a Path>,
    pub user_id: Option<String>,
    pub conversation_id: Option<String>,
}

pub async fn run<W: Write>(
    config: &ProbeConfig,
    args: RunArgs<'_>,
    out: &mut W,
) -> Result<Outcome> {
    let scenario = match args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => Scenario::builtin(args.name)?,
    };

    let mut session = SessionIds::generate(&config.user_prefix, &config.conversation_prefix);
    if let Some(user_id) = args.user_id {
        session.user_id = user_id;
    }
    if let Some(conversation_id) = args.conversation_id {
        session.conversation_id = conversation_id;
    }

    writeln!(out, "Scenario: {} ({})", scenario.name, scenario.description)?;
    writeln!(out, "User ID: {}", session.user_id)?;
    writeln!(out, "Conversation ID: {}", session.conversation_id)?;

    let report = {
        let mut runner = Runner::new(
            client(config)?,
            session,
            RunOptions::from_config(config),
            &mut *out,
        );
        runner.run(&scenario).await?
    };

    writeln!(out, "\n{}", report.summary_line())?;
    for failure in report.failures() {
        if let StepStatus::Failed(reason) = &failure.status {
            writeln!(out, "  step {} ({}): {}", failure.index, failure.label, reason)?;
        }
    }
    out.flush()?;

    Ok(Outcome::from_bool(report.is_success()))
}

pub async fn add<W: Write>(
    config: &ProbeConfig,
    user_id: &str,
    conversation_id: &str,
    kind: TurnKind,
    text: &str,
    out: &mut W,
) -> Result<Outcome> {
    let turn = ConversationTurn::now(user_id, conversation_id, kind, text);
    let record = client(config)?
        .add_turn(&turn)
        .await
        .context("failed to add conversation turn")?;

    writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
    Ok(Outcome::Success)
}

pub async fn retrieve<W: Write>(
    config: &ProbeConfig,
    user_id: &str,
    query: &str,
    out: &mut W,
) -> Result<Outcome> {
    let retrieval = client(config)?
        .retrieve_memory(user_id, query)
        .await
        .with_context(|| format!("failed to retrieve memories for '{}'", query))?;

    render::write_section(out, &format!("Testing Memory Retrieval for '{}'", query))?;
    render::write_retrieval(out, &retrieval, &display(config))?;
    out.flush()?;
    Ok(Outcome::Success)
}

pub fn scenarios<W: Write>(show: Option<&str>, out: &mut W) -> Result<Outcome> {
    match show {
        Some(name) => {
            let scenario = Scenario::builtin(name)?;
            writeln!(out, "{}", scenario.to_ron()?)?;
        }
        None => {
            for name in Scenario::builtin_names() {
                let scenario = Scenario::builtin(name)?;
                writeln!(out, "{:<16} {}", scenario.name, scenario.description)?;
            }
        }
    }
    Ok(Outcome::Success)
}
