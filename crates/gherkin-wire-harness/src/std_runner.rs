//! In-process reference runner.

use std::iter;
use std::panic::{self, AssertUnwindSafe};

use crate::config;
use crate::error::StepFailure;
use crate::fixtures::{FixtureProvider, FixtureSet, Fixtures};
use crate::panic::panic_message;
use crate::report::{RunReport, StepRecord, StepStatus, TestRecord, TestStatus};
use crate::runner::{Runner, StepControl, StepScope, TestBody};

#[derive(Debug, Default)]
struct Group {
    name: String,
    hooks: Vec<TestBody>,
    entries: Vec<Entry>,
}

#[derive(Debug)]
enum Entry {
    Group(Group),
    Test { name: String, body: TestBody },
}

/// Synchronous runner that records registrations and executes them on demand.
///
/// Tests run one after another in registration order. Each test gets fresh
/// fixtures built from the [`FixtureProvider`], limited to the union of what
/// its applicable hooks and its own body request. A failing or panicking test
/// never affects its siblings.
///
/// # Examples
///
/// ```
/// use gherkin_wire_harness::{FixtureSet, Runner, StdRunner, TestBody};
///
/// let mut runner = StdRunner::new();
/// runner.describe("Feature", &mut |group| {
///     group.test("Scenario", TestBody::new(FixtureSet::new(), |scope| {
///         scope.step("Given nothing", &mut |_| Ok(()))
///     }));
/// });
/// let report = runner.run();
/// assert_eq!(report.passed(), 1);
/// assert_eq!(report.tests()[0].title(), "Feature > Scenario");
/// ```
#[derive(Debug)]
pub struct StdRunner {
    root: Group,
    open: Vec<Group>,
    provider: FixtureProvider,
    strict_fixtures: bool,
}

impl Default for StdRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl StdRunner {
    /// Create a runner without fixtures, honouring the configured
    /// [`strict_fixtures`](crate::strict_fixtures) flag.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fixtures(FixtureProvider::new())
    }

    /// Create a runner offering the given fixtures.
    #[must_use]
    pub fn with_fixtures(provider: FixtureProvider) -> Self {
        Self {
            root: Group::default(),
            open: Vec::new(),
            provider,
            strict_fixtures: config::strict_fixtures(),
        }
    }

    /// Override the unknown-fixture policy for this runner.
    #[must_use]
    pub fn with_strict_fixtures(mut self, strict: bool) -> Self {
        self.strict_fixtures = strict;
        self
    }

    /// Titles of all registered tests in registration order.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        let mut titles = Vec::new();
        collect_titles(&self.root, &mut Vec::new(), &mut titles);
        titles
    }

    /// Number of `before_each` hooks registered at any level.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        count_hooks(&self.root)
    }

    /// Execute every registered test.
    #[must_use]
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        self.run_group(&self.root, &mut Vec::new(), &mut Vec::new(), &mut report);
        report
    }

    fn current(&mut self) -> &mut Group {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    fn run_group<'a>(
        &'a self,
        group: &'a Group,
        path: &mut Vec<String>,
        hooks: &mut Vec<&'a TestBody>,
        report: &mut RunReport,
    ) {
        let inherited = hooks.len();
        hooks.extend(group.hooks.iter());
        for entry in &group.entries {
            match entry {
                Entry::Group(inner) => {
                    path.push(inner.name.clone());
                    self.run_group(inner, path, hooks, report);
                    path.pop();
                }
                Entry::Test { name, body } => {
                    report.push(self.run_test(path, hooks, name, body));
                }
            }
        }
        hooks.truncate(inherited);
    }

    fn run_test(
        &self,
        path: &[String],
        hooks: &[&TestBody],
        name: &str,
        body: &TestBody,
    ) -> TestRecord {
        let requested = FixtureSet::union(
            hooks
                .iter()
                .map(|hook| hook.fixtures())
                .chain(iter::once(body.fixtures())),
        );
        log::debug!("running test '{name}' with fixtures {requested}");
        let fixtures = match self.provider.materialize(&requested, self.strict_fixtures) {
            Ok(fixtures) => fixtures,
            Err(err) => {
                return TestRecord::new(
                    path.to_vec(),
                    name,
                    Vec::new(),
                    TestStatus::Failed {
                        message: err.to_string(),
                    },
                );
            }
        };

        let mut scope = RecordingScope {
            fixtures,
            steps: Vec::new(),
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            hooks
                .iter()
                .try_for_each(|hook| hook.run(&mut scope))
                .and_then(|()| body.run(&mut scope))
        }))
        .unwrap_or_else(|payload| Err(panic_message(payload.as_ref()).into()));

        let status = match outcome {
            Err(err) => TestStatus::Failed {
                message: err.to_string(),
            },
            Ok(()) if scope.any_skipped() => TestStatus::Skipped,
            Ok(()) => TestStatus::Passed,
        };
        log::debug!("test '{name}' finished: {status:?}");
        TestRecord::new(path.to_vec(), name, scope.steps, status)
    }
}

impl Runner for StdRunner {
    fn describe(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Runner)) {
        self.open.push(Group {
            name: name.to_owned(),
            ..Group::default()
        });
        body(self);
        if let Some(group) = self.open.pop() {
            self.current().entries.push(Entry::Group(group));
        }
    }

    fn before_each(&mut self, hook: TestBody) {
        self.current().hooks.push(hook);
    }

    fn test(&mut self, name: &str, body: TestBody) {
        self.current().entries.push(Entry::Test {
            name: name.to_owned(),
            body,
        });
    }
}

struct RecordingScope {
    fixtures: Fixtures,
    steps: Vec<StepRecord>,
}

impl RecordingScope {
    fn any_skipped(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step.status(), StepStatus::Skipped { .. }))
    }
}

impl StepScope for RecordingScope {
    fn step(
        &mut self,
        label: &str,
        body: &mut dyn FnMut(&mut StepControl<'_>) -> Result<(), StepFailure>,
    ) -> Result<(), StepFailure> {
        let mut control = StepControl::new(&mut self.fixtures);
        let result = panic::catch_unwind(AssertUnwindSafe(|| body(&mut control)))
            .unwrap_or_else(|payload| Err(panic_message(payload.as_ref()).into()));
        let status = match (&result, control.into_skip_message()) {
            (Err(err), _) => StepStatus::Failed {
                message: err.to_string(),
            },
            (Ok(()), Some(message)) => StepStatus::Skipped { message },
            (Ok(()), None) => StepStatus::Passed,
        };
        self.steps.push(StepRecord::new(label, status));
        result
    }
}

fn collect_titles(group: &Group, path: &mut Vec<String>, out: &mut Vec<String>) {
    for entry in &group.entries {
        match entry {
            Entry::Group(inner) => {
                path.push(inner.name.clone());
                collect_titles(inner, path, out);
                path.pop();
            }
            Entry::Test { name, .. } => {
                let mut parts = path.clone();
                parts.push(name.clone());
                out.push(parts.join(" > "));
            }
        }
    }
}

fn count_hooks(group: &Group) -> usize {
    group.hooks.len()
        + group
            .entries
            .iter()
            .map(|entry| match entry {
                Entry::Group(inner) => count_hooks(inner),
                Entry::Test { .. } => 0,
            })
            .sum::<usize>()
}
