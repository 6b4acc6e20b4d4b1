//! Runtime configuration for the translation engine.
//!
//! The `fail_on_unresolved` flag decides whether a step without a matching
//! handler fails its scenario instead of being reported as skipped.

use gherkin_wire_harness::BoolFlag;

static FAIL_ON_UNRESOLVED: BoolFlag = BoolFlag::new("GHERKIN_WIRE_FAIL_ON_UNRESOLVED", false);

/// Determine whether unresolved steps fail their scenario.
///
/// Precedence: in-process override, then `GHERKIN_WIRE_FAIL_ON_UNRESOLVED`,
/// then the default (`false`, unresolved steps are skipped).
#[must_use]
pub fn fail_on_unresolved() -> bool {
    FAIL_ON_UNRESOLVED.get()
}

/// Override the `fail_on_unresolved` flag for the current process.
///
/// Tests may call [`clear_fail_on_unresolved_override`] to restore
/// environment driven behaviour afterwards.
pub fn set_fail_on_unresolved(enabled: bool) {
    FAIL_ON_UNRESOLVED.set(enabled);
}

/// Remove any in-process override for the `fail_on_unresolved` flag.
pub fn clear_fail_on_unresolved_override() {
    FAIL_ON_UNRESOLVED.clear();
}
