//! Error types for step execution, handler registration and document loading.

use std::path::PathBuf;

use gherkin_wire_harness::HarnessError;
use thiserror::Error;

use crate::keyword::StepKeyword;

/// Error returned by a step handler or raised while running a step.
///
/// Handlers return [`StepError::Failed`] for assertion-style failures and may
/// propagate any other error through the boxed [`StepError::Other`] variant
/// using `?`.
///
/// # Examples
///
/// ```
/// use gherkin_wire::StepError;
///
/// let err = StepError::failed("expected 3 cats, saw 2");
/// assert_eq!(err.to_string(), "expected 3 cats, saw 2");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StepError {
    /// The handler reported a failure.
    #[error("{0}")]
    Failed(String),
    /// No handler matched the step and unresolved steps are configured to fail.
    #[error("step '{label}' has no handler; register one with HandlerRegistry::{method}")]
    Unresolved {
        /// Literal keyword and text of the step.
        label: String,
        /// Registry method the handler should be added with.
        method: &'static str,
    },
    /// A fixture could not be read from the test's fixtures.
    #[error(transparent)]
    Fixture(#[from] HarnessError),
    /// Any other error raised by the handler.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl StepError {
    /// Build a [`StepError::Failed`] from a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Invalid step pattern.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// A `{` opened a placeholder that was never closed or has an invalid name.
    #[error("{message} at byte {position} (zero-based)")]
    Placeholder {
        /// What was wrong.
        message: &'static str,
        /// Byte offset of the offending brace.
        position: usize,
    },
    /// The generated regular expression failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// Error raised while registering a step handler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// A handler for the same keyword and pattern already exists.
    #[error("duplicate step handler for '{keyword}' + '{pattern}'")]
    Duplicate {
        /// Keyword the handler was registered for.
        keyword: StepKeyword,
        /// Pattern text.
        pattern: String,
    },
    /// The pattern could not be compiled.
    #[error("invalid step pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern text.
        pattern: String,
        /// Underlying compilation error.
        source: PatternError,
    },
    /// Handlers are registered under `Given`, `When` or `Then` only.
    #[error("cannot register '{pattern}' under conjunction keyword '{keyword}'")]
    Conjunction {
        /// Offending keyword.
        keyword: StepKeyword,
        /// Pattern text.
        pattern: String,
    },
}

/// Error raised while loading a Gherkin document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    /// Failed to read the feature file.
    #[error("failed to read feature file {}: {source}", path.display())]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The Gherkin parser rejected the text.
    #[error("failed to parse feature file: {0}")]
    Parse(#[from] gherkin::ParseError),
}
