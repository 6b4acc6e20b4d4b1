//! Command dispatch for the `gherkin-wire` binary.

use std::io::Write;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use eyre::{Context, Result};
use gherkin_wire::{Plan, Translator};

use crate::config::LogLevel;
use crate::features::{gather_features, load_document};
use crate::output::{write_anomalies, write_json, write_plan};

/// Inspect how feature files translate into runner registrations.
#[derive(Parser)]
#[command(name = "gherkin-wire", author, version, about)]
pub(crate) struct Cli {
    /// Log level (trace, debug, info, warn, error); overrides
    /// `GHERKIN_WIRE_LOG_LEVEL`.
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Commands,
}

/// Supported commands.
#[derive(Subcommand)]
enum Commands {
    /// Show the groups, hooks, tests and step resolutions a document produces.
    Plan(PlanArgs),
    /// Report structural anomalies; exits non-zero when any are found.
    Lint(LintArgs),
}

#[derive(Args)]
struct PlanArgs {
    /// Feature files or directories to search for `.feature` files.
    #[arg(required = true)]
    paths: Vec<Utf8PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Args)]
struct LintArgs {
    /// Feature files or directories to search for `.feature` files.
    #[arg(required = true)]
    paths: Vec<Utf8PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

pub(crate) fn run(cli: &Cli, out: &mut dyn Write) -> Result<ExitCode> {
    match &cli.command {
        Commands::Plan(args) => handle_plan(args, out),
        Commands::Lint(args) => handle_lint(args, out),
    }
}

fn build_plan(paths: &[Utf8PathBuf]) -> Result<Plan> {
    let files = gather_features(paths)?;
    tracing::info!(files = files.len(), "translating feature files");
    let document = load_document(&files)?;
    Ok(Translator::global().plan(&document))
}

fn handle_plan(args: &PlanArgs, out: &mut dyn Write) -> Result<ExitCode> {
    let plan = build_plan(&args.paths)?;
    match args.format {
        Format::Text => write_plan(out, &plan)?,
        Format::Json => {
            let value = serde_json::to_value(plan.summary()).wrap_err("failed to summarise plan")?;
            write_json(out, &value)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_lint(args: &LintArgs, out: &mut dyn Write) -> Result<ExitCode> {
    let plan = build_plan(&args.paths)?;
    let anomalies = plan.anomalies();
    match args.format {
        Format::Text => {
            write_anomalies(out, &anomalies)?;
            writeln!(out, "{} anomaly(ies) found", anomalies.len())
                .wrap_err("failed to write lint summary")?;
        }
        Format::Json => {
            let value = serde_json::to_value(&anomalies).wrap_err("failed to serialize anomalies")?;
            write_json(out, &value)?;
        }
    }
    if anomalies.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(count = anomalies.len(), "anomalies found");
        Ok(ExitCode::FAILURE)
    }
}
