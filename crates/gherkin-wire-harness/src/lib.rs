//! Runner contracts for `gherkin-wire`.
//!
//! The translation engine never executes anything on its own. It registers
//! named groups, per-test setup hooks and tests with a [`Runner`], and each
//! registered [`TestBody`] declares the [`FixtureSet`] it needs so the runner
//! materialises only those fixtures. [`StdRunner`] is the in-process
//! reference implementation used by tests and by the diagnostic CLI.

mod config;
mod error;
mod fixtures;
mod panic;
mod report;
mod runner;
mod std_runner;

pub use config::{
    BoolFlag, clear_strict_fixtures_override, parse_env_bool, set_strict_fixtures,
    strict_fixtures,
};
pub use error::{HarnessError, StepFailure};
pub use fixtures::{FixtureProvider, FixtureSet, Fixtures};
pub use panic::panic_message;
pub use report::{RunReport, StepRecord, StepStatus, TestRecord, TestStatus};
pub use runner::{Runner, StepControl, StepScope, TestBody, TestFn};
pub use std_runner::StdRunner;
