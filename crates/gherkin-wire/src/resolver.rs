//! Step resolution with keyword propagation.
//!
//! `And` and `But` steps are looked up under the effective keyword of the
//! step before them. A conjunction with nothing to inherit from is reported
//! as an [`Anomaly`] and never looked up under a guessed keyword.

use std::fmt;

use gherkin_wire_harness::FixtureSet;

use crate::document::Step;
use crate::keyword::StepKeyword;
use crate::registry::{ResolvedHandler, StepLookup};

/// Structural problem found while resolving a step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
#[cfg_attr(feature = "diagnostics", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Anomaly {
    /// An `And`/`But` step has no preceding step to take its keyword from.
    LeadingConjunction {
        /// Literal keyword and text of the step.
        label: String,
    },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeadingConjunction { label } => write!(
                f,
                "step '{label}' starts with a conjunction but has no preceding step to take its keyword from"
            ),
        }
    }
}

/// A step paired with its handler, if one was found.
#[derive(Debug, Clone)]
pub struct ResolvedStep {
    step: Step,
    keyword: Option<StepKeyword>,
    handler: Option<ResolvedHandler>,
    fixtures: FixtureSet,
    anomaly: Option<Anomaly>,
}

impl ResolvedStep {
    /// The step as written, after outline substitution.
    #[must_use]
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// Keyword used for lookup; `None` when the step is anomalous.
    #[must_use]
    pub fn keyword(&self) -> Option<StepKeyword> {
        self.keyword
    }

    /// The matched handler, absent for unimplemented steps.
    #[must_use]
    pub fn handler(&self) -> Option<&ResolvedHandler> {
        self.handler.as_ref()
    }

    /// Fixtures the matched handler declares; empty when unresolved.
    #[must_use]
    pub fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    /// Structural problem found during resolution.
    #[must_use]
    pub fn anomaly(&self) -> Option<&Anomaly> {
        self.anomaly.as_ref()
    }

    /// Whether a handler was found.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.handler.is_some()
    }
}

/// Resolve one step given the effective keyword of the step before it.
#[must_use]
pub fn resolve_step(
    step: &Step,
    previous: Option<StepKeyword>,
    lookup: &dyn StepLookup,
) -> ResolvedStep {
    let Some(keyword) = step.kind.effective(previous) else {
        let anomaly = Anomaly::LeadingConjunction { label: step.label() };
        log::warn!("{anomaly}");
        return ResolvedStep {
            step: step.clone(),
            keyword: None,
            handler: None,
            fixtures: FixtureSet::new(),
            anomaly: Some(anomaly),
        };
    };

    let handler = lookup.resolve(keyword, &step.text);
    let fixtures = handler
        .as_ref()
        .map(|resolved| lookup.fixtures(resolved.handler()))
        .unwrap_or_default();
    if handler.is_none() {
        log::debug!("no {keyword} handler for '{}'", step.text);
    }
    ResolvedStep {
        step: step.clone(),
        keyword: Some(keyword),
        handler,
        fixtures,
        anomaly: None,
    }
}

/// Resolve the steps of one scenario or background in document order.
#[must_use]
pub fn resolve_steps(steps: &[Step], lookup: &dyn StepLookup) -> Vec<ResolvedStep> {
    let mut previous = None;
    steps
        .iter()
        .map(|step| {
            let resolved = resolve_step(step, previous, lookup);
            previous = resolved.keyword;
            resolved
        })
        .collect()
}
