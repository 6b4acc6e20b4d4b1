//! Error types raised by the harness.

use thiserror::Error;

/// Failure produced by a step body.
///
/// Step bodies are supplied by the translation layer, so the harness only
/// needs a type-erased error it can report and propagate.
pub type StepFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while preparing or accessing fixtures.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum HarnessError {
    /// A test requested a fixture that the provider does not know about.
    #[error("unknown fixture '{name}'; available fixtures: [{available}]")]
    UnknownFixture {
        /// Name of the requested fixture.
        name: String,
        /// Comma separated list of fixtures the provider can build.
        available: String,
    },
    /// A step asked for a fixture that was not materialised for this test.
    #[error("fixture '{name}' was not requested for this test")]
    MissingFixture {
        /// Name of the fixture.
        name: String,
    },
    /// The fixture exists but holds a value of another type.
    #[error("fixture '{name}' does not hold a value of type `{expected}`")]
    FixtureType {
        /// Name of the fixture.
        name: String,
        /// Name of the type the caller asked for.
        expected: &'static str,
    },
}
