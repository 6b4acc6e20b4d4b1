//! Command line inspection of gherkin-wire translation plans.
//!
//! `gherkin-wire plan` prints what a set of feature files registers with a
//! runner and how each step resolves; `gherkin-wire lint` reports structural
//! anomalies and fails when it finds any. Steps resolve against the global
//! registry of this binary.

mod cli;
mod config;
mod features;
mod logging;
mod output;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use eyre::{Context, Result};

use crate::cli::Cli;
use crate::config::CliConfig;
use crate::logging::init_logging;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = CliConfig::from_env()
        .wrap_err("invalid configuration")?
        .apply_overrides(cli.log_level);
    init_logging(&config);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting gherkin-wire");

    let mut stdout = io::stdout().lock();
    let code = cli::run(&cli, &mut stdout)?;
    stdout.flush().wrap_err("failed to flush stdout")?;
    Ok(code)
}
