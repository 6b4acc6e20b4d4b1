//! Immutable Gherkin document model consumed by the translator.
//!
//! The model keeps exactly what translation needs: names, tags, steps with
//! their payloads, and example tables. Children are stored in the order they
//! were written so groups and tests are registered in document order.

mod parse;

use crate::keyword::StepKeyword;

/// One or more features translated together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Features in load order.
    pub features: Vec<Feature>,
}

impl Document {
    /// Wrap a list of features.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

impl From<Feature> for Document {
    fn from(feature: Feature) -> Self {
        Self::new(vec![feature])
    }
}

/// Top-level named group of scenarios and rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feature {
    /// Feature title.
    pub name: String,
    /// Tags without the leading `@`.
    pub tags: Vec<String>,
    /// Backgrounds, rules and scenarios in document order.
    pub children: Vec<FeatureChild>,
}

/// Child of a [`Feature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureChild {
    /// Steps run before every scenario of the feature, rules included.
    Background(Background),
    /// Nested group.
    Rule(Rule),
    /// A scenario or scenario outline.
    Scenario(Scenario),
}

/// Intermediate grouping within a feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    /// Rule title.
    pub name: String,
    /// Tags without the leading `@`.
    pub tags: Vec<String>,
    /// Backgrounds and scenarios in document order.
    pub children: Vec<RuleChild>,
}

/// Child of a [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleChild {
    /// Steps run before every scenario of the rule.
    Background(Background),
    /// A scenario or scenario outline.
    Scenario(Scenario),
}

/// Steps executed before every scenario in scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Background {
    /// Optional title, empty when absent.
    pub name: String,
    /// Steps in document order.
    pub steps: Vec<Step>,
}

/// A scenario, or a scenario outline when `examples` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    /// Scenario title.
    pub name: String,
    /// Tags without the leading `@`.
    pub tags: Vec<String>,
    /// One-based source line, zero when built in code.
    pub line: usize,
    /// Steps in document order.
    pub steps: Vec<Step>,
    /// Example tables driving outline expansion.
    pub examples: Vec<ExampleTable>,
}

impl Scenario {
    /// Whether the scenario is an outline to be expanded.
    #[must_use]
    pub fn is_outline(&self) -> bool {
        !self.examples.is_empty()
    }
}

/// An `Examples:` block of a scenario outline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleTable {
    /// Optional title, empty when absent.
    pub name: String,
    /// Placeholder names; `None` when the block has no table at all.
    pub header: Option<Vec<String>>,
    /// Substitution values, one row per concrete scenario.
    pub rows: Vec<Vec<String>>,
}

/// Tabular data attached to a step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    /// Cell values, header row included.
    pub rows: Vec<Vec<String>>,
}

/// One line of scenario behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Keyword as written, trimmed (`Given`, `And`, `*`, ...).
    pub keyword: String,
    /// Keyword type used for handler lookup.
    pub kind: StepKeyword,
    /// Step text following the keyword.
    pub text: String,
    /// Attached data table.
    pub table: Option<DataTable>,
    /// Attached doc string.
    pub docstring: Option<String>,
}

impl Step {
    /// Build a step whose literal keyword is the keyword type's name.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_wire::{Step, StepKeyword};
    ///
    /// let step = Step::new(StepKeyword::Given, "a browser");
    /// assert_eq!(step.label(), "Given a browser");
    /// ```
    #[must_use]
    pub fn new(kind: StepKeyword, text: impl Into<String>) -> Self {
        Self {
            keyword: kind.as_str().to_owned(),
            kind,
            text: text.into(),
            table: None,
            docstring: None,
        }
    }

    /// Attach a data table.
    #[must_use]
    pub fn with_table<R, C>(mut self, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.table = Some(DataTable {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        });
        self
    }

    /// Attach a doc string.
    #[must_use]
    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }

    /// Literal keyword followed by the step text, as shown to users.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.keyword, self.text)
    }
}
