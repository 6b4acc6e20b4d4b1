//! CLI configuration read from the environment.
//!
//! Settings come from variables prefixed with `GHERKIN_WIRE_`; command line
//! flags override them.

use std::env;
use std::str::FromStr;

use thiserror::Error;

const LOG_LEVEL_ENV: &str = "GHERKIN_WIRE_LOG_LEVEL";

/// Invalid configuration value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The log level is not one of the known names.
    #[error("unknown log level '{0}', expected one of: trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Verbosity of diagnostics written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Everything, including per-step resolution decisions.
    Trace,
    /// Resolution and expansion details.
    Debug,
    /// Progress messages.
    Info,
    /// Anomalies and unknown fixtures.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::LogLevel(s.to_owned())),
        }
    }
}

impl LogLevel {
    /// Filter directive understood by `tracing-subscriber`.
    #[must_use]
    pub fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Resolved CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level for stderr diagnostics.
    pub log_level: LogLevel,
}

impl CliConfig {
    /// Load configuration from `GHERKIN_WIRE_LOG_LEVEL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LogLevel`] when the variable holds an unknown
    /// level.
    pub fn from_env() -> Result<Self, ConfigError> {
        let log_level = env::var(LOG_LEVEL_ENV)
            .ok()
            .map(|value| value.parse())
            .transpose()?
            .unwrap_or_default();
        Ok(Self { log_level })
    }

    /// Apply command line overrides.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("trace", LogLevel::Trace)]
    #[case("DEBUG", LogLevel::Debug)]
    #[case("Info", LogLevel::Info)]
    #[case("warning", LogLevel::Warn)]
    #[case("error", LogLevel::Error)]
    fn parses_log_levels(#[case] input: &str, #[case] expected: LogLevel) {
        assert_eq!(input.parse::<LogLevel>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_levels() {
        assert_eq!(
            "loud".parse::<LogLevel>(),
            Err(ConfigError::LogLevel("loud".into()))
        );
    }

    #[test]
    fn overrides_take_precedence() {
        let config = CliConfig::default().apply_overrides(Some(LogLevel::Debug));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(
            CliConfig::default().apply_overrides(None).log_level,
            LogLevel::Warn
        );
    }
}
