//! The runner contract consumed by the translation layer.

use std::fmt;
use std::sync::Arc;

use crate::error::StepFailure;
use crate::fixtures::{FixtureSet, Fixtures};

/// Type-erased body of a test or setup hook.
pub type TestFn = Arc<dyn Fn(&mut dyn StepScope) -> Result<(), StepFailure> + Send + Sync>;

/// A registered test or `before_each` hook.
///
/// The body declares the fixtures it needs; the runner materialises exactly
/// that set before invoking it.
///
/// # Examples
///
/// ```
/// use gherkin_wire_harness::{FixtureSet, TestBody};
///
/// let body = TestBody::new(FixtureSet::from_iter(["page"]), |scope| {
///     scope.step("Given a page", &mut |control| {
///         assert!(control.fixtures().contains("page"));
///         Ok(())
///     })
/// });
/// assert_eq!(body.fixtures().names().collect::<Vec<_>>(), ["page"]);
/// ```
#[derive(Clone)]
pub struct TestBody {
    fixtures: FixtureSet,
    run: TestFn,
}

impl TestBody {
    /// Wrap a closure together with the fixtures it requests.
    #[must_use]
    pub fn new<F>(fixtures: FixtureSet, run: F) -> Self
    where
        F: Fn(&mut dyn StepScope) -> Result<(), StepFailure> + Send + Sync + 'static,
    {
        Self {
            fixtures,
            run: Arc::new(run),
        }
    }

    /// Fixtures the body requests.
    #[must_use]
    pub fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    /// Invoke the body inside the given scope.
    ///
    /// # Errors
    ///
    /// Propagates the first failure reported by the body.
    pub fn run(&self, scope: &mut dyn StepScope) -> Result<(), StepFailure> {
        (self.run)(scope)
    }
}

impl fmt::Debug for TestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestBody")
            .field("fixtures", &self.fixtures)
            .finish_non_exhaustive()
    }
}

/// Registration primitives of a test runner.
///
/// Registration happens up front; execution is entirely under the runner's
/// control.
pub trait Runner {
    /// Open a named group and register its contents through `body`.
    fn describe(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Runner));

    /// Register a setup routine that runs before every test of the current
    /// group, including tests of nested groups.
    fn before_each(&mut self, hook: TestBody);

    /// Register a test in the current group.
    fn test(&mut self, name: &str, body: TestBody);
}

/// Execution-time primitives available to a running test body.
pub trait StepScope {
    /// Run `body` as a named sub-step.
    ///
    /// # Errors
    ///
    /// Returns the failure produced by `body`, which the caller is expected
    /// to propagate so the enclosing test fails.
    fn step(
        &mut self,
        label: &str,
        body: &mut dyn FnMut(&mut StepControl<'_>) -> Result<(), StepFailure>,
    ) -> Result<(), StepFailure>;
}

/// Handle given to a sub-step: fixture access plus the skip primitive.
#[derive(Debug)]
pub struct StepControl<'a> {
    fixtures: &'a mut Fixtures,
    skipped: Option<String>,
}

impl<'a> StepControl<'a> {
    /// Wrap the fixtures of the current test.
    #[must_use]
    pub fn new(fixtures: &'a mut Fixtures) -> Self {
        Self {
            fixtures,
            skipped: None,
        }
    }

    /// Fixtures materialised for the current test.
    pub fn fixtures(&mut self) -> &mut Fixtures {
        self.fixtures
    }

    /// Mark the current step as skipped with a diagnostic message.
    pub fn skip(&mut self, message: impl Into<String>) {
        self.skipped = Some(message.into());
    }

    /// Consume the handle, returning the skip message.
    #[must_use]
    pub fn into_skip_message(self) -> Option<String> {
        self.skipped
    }
}
