//! Per-step arguments handed to handlers.

use std::str::FromStr;

use crate::document::DataTable;
use crate::error::StepError;

/// Extra arguments of one step invocation: the step text, placeholder
/// captures, and any data table or doc string attached to that step.
#[derive(Debug, Clone, Copy)]
pub struct StepArgs<'a> {
    text: &'a str,
    captures: &'a [String],
    table: Option<&'a DataTable>,
    docstring: Option<&'a str>,
}

impl<'a> StepArgs<'a> {
    /// Bundle the arguments of one step.
    #[must_use]
    pub fn new(
        text: &'a str,
        captures: &'a [String],
        table: Option<&'a DataTable>,
        docstring: Option<&'a str>,
    ) -> Self {
        Self {
            text,
            captures,
            table,
            docstring,
        }
    }

    /// Step text after outline substitution.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Placeholder values in pattern order.
    #[must_use]
    pub fn captures(&self) -> &'a [String] {
        self.captures
    }

    /// Data table attached to the step.
    #[must_use]
    pub fn table(&self) -> Option<&'a DataTable> {
        self.table
    }

    /// Doc string attached to the step.
    #[must_use]
    pub fn docstring(&self) -> Option<&'a str> {
        self.docstring
    }

    /// Parse the capture at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Failed`] when there is no such capture or it does
    /// not parse as `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_wire::StepArgs;
    ///
    /// let captures = vec!["3".to_owned()];
    /// let args = StepArgs::new("I have 3 cats", &captures, None, None);
    /// assert_eq!(args.arg::<u32>(0).unwrap(), 3);
    /// assert!(args.arg::<u32>(1).is_err());
    /// ```
    pub fn arg<T: FromStr>(&self, index: usize) -> Result<T, StepError> {
        let raw = self.captures.get(index).ok_or_else(|| {
            StepError::failed(format!(
                "step '{}' has no capture at position {index}",
                self.text
            ))
        })?;
        raw.parse().map_err(|_| {
            StepError::failed(format!(
                "failed to parse capture {index} from value '{raw}' as {}",
                std::any::type_name::<T>()
            ))
        })
    }
}
