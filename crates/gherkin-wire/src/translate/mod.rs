//! Translation of a [`Document`] into runner registrations.
//!
//! Translation happens in two phases. [`Translator::plan`] walks the
//! document, expands outlines and resolves every step into a [`Plan`]; the
//! plan is then installed onto a [`Runner`], which registers one group per
//! feature and rule, one `before_each` hook per background and one test per
//! concrete scenario, all in document order.

mod plan;

use gherkin_wire_harness::Runner;

use crate::config;
use crate::document::{
    Background, Document, Feature, FeatureChild, Rule, RuleChild, Scenario, Step,
};
use crate::outline::expand_outline;
use crate::program::{ProgramKind, ScenarioProgram};
use crate::registry::{HandlerRegistry, StepLookup};

pub use plan::{Plan, PlanAnomaly, PlanNode};
#[cfg(feature = "diagnostics")]
pub use plan::{PlanSummary, ProgramSummary, StepSummary, SummaryNode};

/// Builds [`Plan`]s against a handler lookup.
pub struct Translator<'a> {
    lookup: &'a dyn StepLookup,
    fail_on_unresolved: bool,
}

impl<'a> Translator<'a> {
    /// Translate against `lookup`, honouring the configured
    /// [`fail_on_unresolved`](crate::fail_on_unresolved) flag.
    #[must_use]
    pub fn new(lookup: &'a dyn StepLookup) -> Self {
        Self {
            lookup,
            fail_on_unresolved: config::fail_on_unresolved(),
        }
    }

    /// Override the unresolved-step policy for this translator.
    #[must_use]
    pub fn with_fail_on_unresolved(mut self, enabled: bool) -> Self {
        self.fail_on_unresolved = enabled;
        self
    }

    /// Resolve every feature of `document` into a plan.
    #[must_use]
    pub fn plan(&self, document: &Document) -> Plan {
        Plan::new(document.features.iter().map(|f| self.feature(f)).collect())
    }

    fn feature(&self, feature: &Feature) -> PlanNode {
        let children = feature
            .children
            .iter()
            .flat_map(|child| match child {
                FeatureChild::Background(background) => vec![self.background(background)],
                FeatureChild::Rule(rule) => vec![self.rule(rule)],
                FeatureChild::Scenario(scenario) => self.scenario(scenario),
            })
            .collect();
        PlanNode::Group {
            name: feature.name.clone(),
            children,
        }
    }

    fn rule(&self, rule: &Rule) -> PlanNode {
        let children = rule
            .children
            .iter()
            .flat_map(|child| match child {
                RuleChild::Background(background) => vec![self.background(background)],
                RuleChild::Scenario(scenario) => self.scenario(scenario),
            })
            .collect();
        PlanNode::Group {
            name: rule.name.clone(),
            children,
        }
    }

    fn background(&self, background: &Background) -> PlanNode {
        PlanNode::Background(self.program(
            ProgramKind::Background,
            &background.name,
            &background.steps,
        ))
    }

    fn scenario(&self, scenario: &Scenario) -> Vec<PlanNode> {
        if !scenario.is_outline() {
            return vec![self.test(scenario)];
        }
        let concrete = expand_outline(scenario);
        log::debug!(
            "outline '{}' expanded into {} scenario(s)",
            scenario.name,
            concrete.len()
        );
        concrete.iter().map(|s| self.test(s)).collect()
    }

    fn test(&self, scenario: &Scenario) -> PlanNode {
        PlanNode::Test(self.program(
            ProgramKind::Scenario,
            &scenario.name,
            &scenario.steps,
        ))
    }

    fn program(&self, kind: ProgramKind, name: &str, steps: &[Step]) -> ScenarioProgram {
        ScenarioProgram::build(kind, name, steps, self.lookup)
            .with_fail_on_unresolved(self.fail_on_unresolved)
    }
}

impl Translator<'static> {
    /// Translate against [`HandlerRegistry::global`].
    #[must_use]
    pub fn global() -> Self {
        Self::new(HandlerRegistry::global())
    }
}

/// Register `document` with `runner`.
///
/// Steps are resolved against `registry`, or against
/// [`HandlerRegistry::global`] when no override is given. Registration is
/// complete when this returns; execution is up to the runner.
///
/// # Examples
///
/// ```
/// use gherkin_wire::{Document, HandlerRegistry, Signature, StepLookup, translate};
/// use gherkin_wire_harness::{FixtureProvider, StdRunner};
///
/// let mut registry = HandlerRegistry::new();
/// registry
///     .given("a counter", Signature::fixtures(["counter"]), |fixtures, _| {
///         *fixtures.require_mut::<u32>("counter")? += 1;
///         Ok(())
///     })
///     .unwrap();
///
/// let document = Document::parse_str(
///     "Feature: Counting\n  Scenario: Increment\n    Given a counter\n",
/// )
/// .unwrap();
/// let mut runner = StdRunner::with_fixtures(FixtureProvider::new().with("counter", || 0_u32));
/// translate(&document, Some(&registry as &dyn StepLookup), &mut runner);
/// assert_eq!(runner.titles(), ["Counting > Increment"]);
/// assert_eq!(runner.run().passed(), 1);
/// ```
pub fn translate(document: &Document, registry: Option<&dyn StepLookup>, runner: &mut dyn Runner) {
    let plan = registry.map_or_else(
        || Translator::global().plan(document),
        |lookup| Translator::new(lookup).plan(document),
    );
    log::debug!(
        "installing {} test(s) from {} feature(s)",
        plan.test_count(),
        document.features.len()
    );
    plan.install(runner);
}

#[cfg(test)]
mod tests;
