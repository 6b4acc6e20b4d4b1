//! Step keyword types.
//!
//! Gherkin distinguishes context (`Given`), action (`When`) and outcome
//! (`Then`) steps. `And` and `But` carry no category of their own: they take
//! the effective keyword of the preceding step.

use std::fmt;
use std::str::FromStr;

use gherkin::StepType;

/// Keyword type of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub enum StepKeyword {
    /// Context-setting step.
    Given,
    /// Action step.
    When,
    /// Outcome step.
    Then,
    /// Conjunction continuing the previous step's category.
    And,
    /// Exception or contrast, also continuing the previous step's category.
    But,
}

impl StepKeyword {
    /// Return the keyword as a string slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_wire::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::Given.as_str(), "Given");
    /// assert_eq!(StepKeyword::But.as_str(), "But");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// Whether the keyword inherits its category from the previous step.
    #[must_use]
    pub const fn is_conjunction(self) -> bool {
        matches!(self, Self::And | Self::But)
    }

    /// Effective keyword given the effective keyword of the preceding step.
    ///
    /// Primary keywords resolve to themselves. Conjunctions resolve to
    /// `previous`, and to `None` when there is no preceding step; callers
    /// report that case instead of guessing a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_wire::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::And.effective(Some(StepKeyword::When)), Some(StepKeyword::When));
    /// assert_eq!(StepKeyword::Then.effective(Some(StepKeyword::When)), Some(StepKeyword::Then));
    /// assert_eq!(StepKeyword::But.effective(None), None);
    /// ```
    #[must_use]
    pub const fn effective(self, previous: Option<Self>) -> Option<Self> {
        if self.is_conjunction() {
            previous
        } else {
            Some(self)
        }
    }

    /// Name of the registry method a handler for this keyword is added with.
    ///
    /// Conjunctions have no registration method of their own.
    #[must_use]
    pub const fn registration_method(self) -> Option<&'static str> {
        match self {
            Self::Given => Some("given"),
            Self::When => Some("when"),
            Self::Then => Some("then"),
            Self::And | Self::But => None,
        }
    }

    /// Classify a parsed step from its literal keyword text and typed variant.
    ///
    /// The literal text wins for conjunctions (`And`, `But`, `*`) so they can
    /// be resolved against the preceding step later on.
    #[must_use]
    pub fn classify(literal: &str, ty: StepType) -> Self {
        match literal.trim() {
            "*" => Self::And,
            s if s.eq_ignore_ascii_case("and") => Self::And,
            s if s.eq_ignore_ascii_case("but") => Self::But,
            _ => Self::from(ty),
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`StepKeyword`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid step keyword: {0}")]
pub struct StepKeywordParseError(pub String);

impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        [Self::Given, Self::When, Self::Then, Self::And, Self::But]
            .into_iter()
            .find(|kw| trimmed.eq_ignore_ascii_case(kw.as_str()))
            .ok_or_else(|| StepKeywordParseError(trimmed.to_owned()))
    }
}

impl From<StepType> for StepKeyword {
    fn from(ty: StepType) -> Self {
        match ty {
            StepType::Given => Self::Given,
            StepType::When => Self::When,
            StepType::Then => Self::Then,
        }
    }
}
