//! Translate Gherkin documents into test-runner registrations.
//!
//! A [`Document`] is walked feature by feature: features and rules become
//! named groups, backgrounds become `before_each` hooks and every concrete
//! scenario (outlines are expanded first) becomes a test. Each step is
//! resolved against a [`HandlerRegistry`] using its effective keyword, and
//! the fixtures a test needs are derived from the [`Signature`]s of the
//! handlers it uses, so the runner only ever builds what is asked for.
//!
//! Handlers are registered on an explicit [`HandlerRegistry`] or globally
//! with the [`step!`] macro; [`translate`] falls back to the global registry
//! when no override is given.
//!
//! ```
//! use gherkin_wire::{Document, HandlerRegistry, Signature, Translator};
//! use gherkin_wire_harness::{FixtureProvider, StdRunner};
//!
//! let mut registry = HandlerRegistry::new();
//! registry
//!     .when("I add {n}", Signature::fixtures(["total"]), |fixtures, args| {
//!         *fixtures.require_mut::<i64>("total")? += args.arg::<i64>(0)?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let document = Document::parse_str(
//!     "Feature: Sums\n  Scenario Outline: Add\n    When I add <n>\n\n    Examples:\n      | n |\n      | 1 |\n      | 2 |\n",
//! )
//! .unwrap();
//! let plan = Translator::new(&registry).plan(&document);
//! let mut runner = StdRunner::with_fixtures(FixtureProvider::new().with("total", || 0_i64));
//! plan.install(&mut runner);
//! assert_eq!(runner.titles(), ["Sums > Add (1)", "Sums > Add (2)"]);
//! assert_eq!(runner.run().passed(), 2);
//! ```

mod args;
mod config;
mod document;
mod error;
mod keyword;
mod outline;
mod pattern;
mod program;
mod registry;
mod resolver;
mod signature;
mod translate;

pub use inventory::submit;

pub use args::StepArgs;
pub use config::{clear_fail_on_unresolved_override, fail_on_unresolved, set_fail_on_unresolved};
pub use document::{
    Background, DataTable, Document, ExampleTable, Feature, FeatureChild, Rule, RuleChild,
    Scenario, Step,
};
pub use error::{DocumentError, PatternError, RegistryError, StepError};
pub use keyword::{StepKeyword, StepKeywordParseError};
pub use outline::expand_outline;
pub use pattern::{Specificity, StepPattern};
pub use program::{ProgramKind, ScenarioProgram};
pub use registry::{
    Handler, HandlerId, HandlerRegistry, ResolvedHandler, StaticSignature, StepDefinition, StepFn,
    StepLookup,
};
pub use resolver::{Anomaly, ResolvedStep, resolve_step, resolve_steps};
pub use signature::{Signature, SignatureAnalyzer};
pub use translate::{Plan, PlanAnomaly, PlanNode, Translator, translate};
#[cfg(feature = "diagnostics")]
pub use translate::{PlanSummary, ProgramSummary, StepSummary, SummaryNode};
