//! Stderr logging for the CLI.
//!
//! Stdout carries the command output, so diagnostics go to stderr. Records
//! emitted through the `log` facade by the library crates are forwarded to
//! the same subscriber.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::CliConfig;

fn filter_from_config(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Install the global subscriber.
///
/// A subscriber installed earlier, for example by a test harness, is kept.
pub fn init_logging(config: &CliConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    let _ = subscriber.try_init();
}
