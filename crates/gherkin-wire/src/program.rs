//! Executable form of one scenario or background.
//!
//! A [`ScenarioProgram`] holds the resolved steps in document order and the
//! union of the fixtures their handlers declare. Turned into a
//! [`TestBody`], it requests exactly that fixture set from the runner and
//! executes each step as a named sub-step.

use std::sync::Arc;

use gherkin_wire_harness::{FixtureSet, StepControl, StepFailure, StepScope, TestBody};

use crate::args::StepArgs;
use crate::document::Step;
use crate::error::StepError;
use crate::keyword::StepKeyword;
use crate::registry::StepLookup;
use crate::resolver::{ResolvedStep, resolve_steps};

/// Whether a program runs as a setup hook or as a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
#[cfg_attr(feature = "diagnostics", serde(rename_all = "snake_case"))]
pub enum ProgramKind {
    /// Installed with `before_each`.
    Background,
    /// Registered with `test`.
    Scenario,
}

/// Resolved steps of one scenario or background plus the fixtures they need.
#[derive(Debug, Clone)]
pub struct ScenarioProgram {
    kind: ProgramKind,
    name: String,
    steps: Vec<ResolvedStep>,
    fixtures: FixtureSet,
    fail_on_unresolved: bool,
}

impl ScenarioProgram {
    /// Resolve `steps` against `lookup` and compute the fixture union.
    #[must_use]
    pub fn build(
        kind: ProgramKind,
        name: impl Into<String>,
        steps: &[Step],
        lookup: &dyn StepLookup,
    ) -> Self {
        let steps = resolve_steps(steps, lookup);
        let fixtures = FixtureSet::union(steps.iter().map(ResolvedStep::fixtures));
        Self {
            kind,
            name: name.into(),
            steps,
            fixtures,
            fail_on_unresolved: false,
        }
    }

    /// Fail instead of skip when a step has no handler.
    #[must_use]
    pub fn with_fail_on_unresolved(mut self, enabled: bool) -> Self {
        self.fail_on_unresolved = enabled;
        self
    }

    /// Background or scenario.
    #[must_use]
    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    /// Test name; empty for unnamed backgrounds.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved steps in document order.
    #[must_use]
    pub fn steps(&self) -> &[ResolvedStep] {
        &self.steps
    }

    /// Union of the fixtures every resolved step declares, first-seen order.
    #[must_use]
    pub fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    /// Whether unresolved steps fail the program.
    #[must_use]
    pub fn fails_on_unresolved(&self) -> bool {
        self.fail_on_unresolved
    }

    /// Execute every step in order inside `scope`.
    ///
    /// # Errors
    ///
    /// Returns the first step failure. Unresolved steps are skipped unless
    /// configured to fail; skipped steps never stop later steps.
    pub fn run(&self, scope: &mut dyn StepScope) -> Result<(), StepFailure> {
        for resolved in &self.steps {
            let label = resolved.step().label();
            scope.step(&label, &mut |control| self.run_step(resolved, control))?;
        }
        Ok(())
    }

    fn run_step(
        &self,
        resolved: &ResolvedStep,
        control: &mut StepControl<'_>,
    ) -> Result<(), StepFailure> {
        let step = resolved.step();
        if let Some(anomaly) = resolved.anomaly() {
            control.skip(anomaly.to_string());
            return Ok(());
        }
        let Some(matched) = resolved.handler() else {
            let method = resolved
                .keyword()
                .and_then(StepKeyword::registration_method)
                .unwrap_or("given");
            if self.fail_on_unresolved {
                return Err(StepError::Unresolved {
                    label: step.label(),
                    method,
                }
                .into());
            }
            control.skip(format!(
                "No handler found for step '{}'. Add one using HandlerRegistry::{method}",
                step.label()
            ));
            return Ok(());
        };

        let args = StepArgs::new(
            &step.text,
            matched.captures(),
            step.table.as_ref(),
            step.docstring.as_deref(),
        );
        matched
            .handler()
            .invoke(control.fixtures(), &args)
            .map_err(Into::into)
    }

    /// Wrap the program as a runner test body requesting its fixture set.
    #[must_use]
    pub fn into_test_body(self) -> TestBody {
        let fixtures = self.fixtures.clone();
        let program = Arc::new(self);
        TestBody::new(fixtures, move |scope| program.run(scope))
    }
}
