//! Outcomes recorded by [`StdRunner`](crate::StdRunner).

/// Outcome of a single sub-step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// The step completed.
    Passed,
    /// The step was marked as skipped.
    Skipped {
        /// Diagnostic message supplied with the skip.
        message: String,
    },
    /// The step failed or panicked.
    Failed {
        /// Rendered failure.
        message: String,
    },
}

/// Record of one sub-step in execution order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRecord {
    label: String,
    status: StepStatus,
}

impl StepRecord {
    pub(crate) fn new(label: impl Into<String>, status: StepStatus) -> Self {
        Self {
            label: label.into(),
            status,
        }
    }

    /// Label the step was opened with.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Outcome of the step.
    #[must_use]
    pub fn status(&self) -> &StepStatus {
        &self.status
    }
}

/// Outcome of a whole test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestStatus {
    /// Every step passed.
    Passed,
    /// No step failed but at least one was skipped.
    Skipped,
    /// Setup or a step failed.
    Failed {
        /// Rendered failure.
        message: String,
    },
}

/// Record of one executed test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRecord {
    path: Vec<String>,
    name: String,
    steps: Vec<StepRecord>,
    status: TestStatus,
}

impl TestRecord {
    pub(crate) fn new(
        path: Vec<String>,
        name: impl Into<String>,
        steps: Vec<StepRecord>,
        status: TestStatus,
    ) -> Self {
        Self {
            path,
            name: name.into(),
            steps,
            status,
        }
    }

    /// Names of the enclosing groups, outermost first.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Test name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full title: group names and test name joined with ` > `.
    #[must_use]
    pub fn title(&self) -> String {
        let mut parts: Vec<&str> = self.path.iter().map(String::as_str).collect();
        parts.push(&self.name);
        parts.join(" > ")
    }

    /// Steps executed for this test, hooks included, in execution order.
    #[must_use]
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Labels of the executed steps.
    #[must_use]
    pub fn step_labels(&self) -> Vec<&str> {
        self.steps.iter().map(StepRecord::label).collect()
    }

    /// Outcome of the test.
    #[must_use]
    pub fn status(&self) -> &TestStatus {
        &self.status
    }
}

/// Records of every test executed by one [`StdRunner::run`](crate::StdRunner::run).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    tests: Vec<TestRecord>,
}

impl RunReport {
    pub(crate) fn push(&mut self, record: TestRecord) {
        self.tests.push(record);
    }

    /// All test records in execution order.
    #[must_use]
    pub fn tests(&self) -> &[TestRecord] {
        &self.tests
    }

    /// Look up a test by name.
    #[must_use]
    pub fn test(&self, name: &str) -> Option<&TestRecord> {
        self.tests.iter().find(|t| t.name == name)
    }

    /// Number of passed tests.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, TestStatus::Passed))
    }

    /// Number of skipped tests.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, TestStatus::Skipped))
    }

    /// Number of failed tests.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, TestStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&TestStatus) -> bool) -> usize {
        self.tests.iter().filter(|t| pred(&t.status)).count()
    }
}
