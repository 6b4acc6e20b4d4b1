//! Scenario outline expansion.
//!
//! Each body row of each example table becomes one concrete scenario, built
//! as a new value from the template so the template is never altered.

use crate::document::{ExampleTable, Scenario, Step};

/// Expand an outline into concrete scenarios, tables first, then rows.
///
/// Tables without a header row produce nothing. A scenario without example
/// tables expands to nothing as well; callers run it as is.
///
/// # Examples
///
/// ```
/// use gherkin_wire::{ExampleTable, Scenario, Step, StepKeyword, expand_outline};
///
/// let outline = Scenario {
///     name: "Cats".into(),
///     steps: vec![Step::new(StepKeyword::Given, "I have <count> cats")],
///     examples: vec![ExampleTable {
///         name: String::new(),
///         header: Some(vec!["count".into()]),
///         rows: vec![vec!["3".into()]],
///     }],
///     ..Scenario::default()
/// };
/// let concrete = expand_outline(&outline);
/// assert_eq!(concrete[0].name, "Cats (1)");
/// assert_eq!(concrete[0].steps[0].text, "I have 3 cats");
/// ```
#[must_use]
pub fn expand_outline(template: &Scenario) -> Vec<Scenario> {
    template
        .examples
        .iter()
        .flat_map(|table| expand_table(template, table))
        .collect()
}

fn expand_table(template: &Scenario, table: &ExampleTable) -> Vec<Scenario> {
    let Some(header) = table.header.as_deref() else {
        log::debug!(
            "examples table '{}' of '{}' has no header; skipping",
            table.name,
            template.name
        );
        return Vec::new();
    };
    table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| Scenario {
            name: concrete_name(&template.name, &table.name, index),
            tags: template.tags.clone(),
            line: template.line,
            steps: template
                .steps
                .iter()
                .map(|step| substitute(step, header, row))
                .collect(),
            examples: Vec::new(),
        })
        .collect()
}

fn concrete_name(template: &str, table: &str, index: usize) -> String {
    let ordinal = index + 1;
    if table.is_empty() {
        format!("{template} ({ordinal})")
    } else {
        format!("{template} -- {table} ({ordinal})")
    }
}

fn substitute(step: &Step, header: &[String], row: &[String]) -> Step {
    let text = header
        .iter()
        .zip(row)
        .fold(step.text.clone(), |text, (column, value)| {
            text.replace(&format!("<{column}>"), value)
        });
    Step {
        text,
        ..step.clone()
    }
}
