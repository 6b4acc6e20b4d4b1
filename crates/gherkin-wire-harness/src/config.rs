//! Runtime configuration for the reference runner.
//!
//! The `strict_fixtures` flag decides whether a test that requests a fixture
//! unknown to the [`FixtureProvider`](crate::FixtureProvider) fails (strict)
//! or simply runs without it.

use std::sync::atomic::{AtomicU8, Ordering};

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_FALSE: u8 = 1;
const OVERRIDE_TRUE: u8 = 2;

static STRICT_FIXTURES: BoolFlag = BoolFlag::new("GHERKIN_WIRE_STRICT_FIXTURES", true);

/// Parse a boolean flag as written in an environment variable.
///
/// Accepts `1`/`0`, `true`/`false`, `yes`/`no` and `on`/`off` in any case.
#[must_use]
pub fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A process-wide boolean setting.
///
/// Resolved from an in-process override, then an environment variable, then
/// a default. Unparseable environment values fall through to the default.
///
/// ```
/// use gherkin_wire_harness::BoolFlag;
///
/// static VERBOSE: BoolFlag = BoolFlag::new("MY_CRATE_VERBOSE", false);
///
/// VERBOSE.set(true);
/// assert!(VERBOSE.get());
/// VERBOSE.clear();
/// ```
#[derive(Debug)]
pub struct BoolFlag {
    env: &'static str,
    default: bool,
    state: AtomicU8,
}

impl BoolFlag {
    /// Declare a flag read from `env` and falling back to `default`.
    #[must_use]
    pub const fn new(env: &'static str, default: bool) -> Self {
        Self {
            env,
            default,
            state: AtomicU8::new(OVERRIDE_UNSET),
        }
    }

    /// Environment variable consulted when no override is set.
    #[must_use]
    pub const fn env(&self) -> &'static str {
        self.env
    }

    /// Current value of the flag.
    #[must_use]
    pub fn get(&self) -> bool {
        self.overridden()
            .or_else(|| self.env_value())
            .unwrap_or(self.default)
    }

    /// Override the flag for the current process.
    pub fn set(&self, enabled: bool) {
        let value = if enabled {
            OVERRIDE_TRUE
        } else {
            OVERRIDE_FALSE
        };
        self.state.store(value, Ordering::Relaxed);
    }

    /// Remove any in-process override.
    pub fn clear(&self) {
        self.state.store(OVERRIDE_UNSET, Ordering::Relaxed);
    }

    fn overridden(&self) -> Option<bool> {
        match self.state.load(Ordering::Relaxed) {
            OVERRIDE_FALSE => Some(false),
            OVERRIDE_TRUE => Some(true),
            _ => None,
        }
    }

    fn env_value(&self) -> Option<bool> {
        std::env::var(self.env)
            .ok()
            .as_deref()
            .and_then(parse_env_bool)
    }
}

/// Determine whether unknown fixture names fail the requesting test.
///
/// Precedence: in-process override, then `GHERKIN_WIRE_STRICT_FIXTURES`,
/// then the default (`true`).
#[must_use]
pub fn strict_fixtures() -> bool {
    STRICT_FIXTURES.get()
}

/// Override the `strict_fixtures` flag for the current process.
pub fn set_strict_fixtures(enabled: bool) {
    STRICT_FIXTURES.set(enabled);
}

/// Remove any in-process override for the `strict_fixtures` flag.
pub fn clear_strict_fixtures_override() {
    STRICT_FIXTURES.clear();
}
