//! Conversion from the `gherkin` crate's AST.
//!
//! The parser stores a feature's background, scenarios and rules in separate
//! fields. The adapter merges them back into one list ordered by source line.

use std::path::Path;

use gherkin::GherkinEnv;

use super::{
    Background, DataTable, Document, ExampleTable, Feature, FeatureChild, Rule, RuleChild,
    Scenario, Step,
};
use crate::error::DocumentError;
use crate::keyword::StepKeyword;

impl Document {
    /// Parse a single feature from Gherkin text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Parse`] when the text is not valid Gherkin.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_wire::{Document, FeatureChild};
    ///
    /// let doc = Document::parse_str("Feature: Cats\n  Scenario: Count\n    Given 3 cats\n").unwrap();
    /// let feature = &doc.features[0];
    /// assert_eq!(feature.name, "Cats");
    /// assert!(matches!(feature.children[0], FeatureChild::Scenario(_)));
    /// ```
    pub fn parse_str(text: &str) -> Result<Self, DocumentError> {
        let mut source = text.to_owned();
        if !source.ends_with('\n') {
            source.push('\n');
        }
        let feature = gherkin::Feature::parse(source.as_str(), GherkinEnv::default())?;
        Ok(Self::from(Feature::from(&feature)))
    }

    /// Read and parse a `.feature` file.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Read`] when the file cannot be read and
    /// [`DocumentError::Parse`] when its content is not valid Gherkin.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("parsing feature file {}", path.display());
        Self::parse_str(&text)
    }
}

impl From<&gherkin::Feature> for Feature {
    fn from(feature: &gherkin::Feature) -> Self {
        let mut children: Vec<(usize, FeatureChild)> = Vec::new();
        if let Some(background) = &feature.background {
            children.push((
                background.position.line,
                FeatureChild::Background(convert_background(background)),
            ));
        }
        children.extend(
            feature
                .scenarios
                .iter()
                .map(|s| (s.position.line, FeatureChild::Scenario(convert_scenario(s)))),
        );
        children.extend(
            feature
                .rules
                .iter()
                .map(|r| (r.position.line, FeatureChild::Rule(convert_rule(r)))),
        );
        children.sort_by_key(|(line, _)| *line);

        Self {
            name: feature.name.clone(),
            tags: convert_tags(&feature.tags),
            children: children.into_iter().map(|(_, child)| child).collect(),
        }
    }
}

fn convert_rule(rule: &gherkin::Rule) -> Rule {
    let mut children: Vec<(usize, RuleChild)> = Vec::new();
    if let Some(background) = &rule.background {
        children.push((
            background.position.line,
            RuleChild::Background(convert_background(background)),
        ));
    }
    children.extend(
        rule.scenarios
            .iter()
            .map(|s| (s.position.line, RuleChild::Scenario(convert_scenario(s)))),
    );
    children.sort_by_key(|(line, _)| *line);

    Rule {
        name: rule.name.clone(),
        tags: convert_tags(&rule.tags),
        children: children.into_iter().map(|(_, child)| child).collect(),
    }
}

fn convert_background(background: &gherkin::Background) -> Background {
    Background {
        name: background.name.clone(),
        steps: background.steps.iter().map(convert_step).collect(),
    }
}

fn convert_scenario(scenario: &gherkin::Scenario) -> Scenario {
    Scenario {
        name: scenario.name.clone(),
        tags: convert_tags(&scenario.tags),
        line: scenario.position.line,
        steps: scenario.steps.iter().map(convert_step).collect(),
        examples: scenario.examples.iter().map(convert_examples).collect(),
    }
}

fn convert_examples(examples: &gherkin::Examples) -> ExampleTable {
    let (header, rows) = examples.table.as_ref().map_or_else(
        || (None, Vec::new()),
        |table| {
            let mut rows = table.rows.iter().cloned();
            (rows.next(), rows.collect())
        },
    );
    ExampleTable {
        name: examples.name.clone().unwrap_or_default(),
        header,
        rows,
    }
}

fn convert_step(step: &gherkin::Step) -> Step {
    Step {
        keyword: step.keyword.trim().to_owned(),
        kind: StepKeyword::classify(&step.keyword, step.ty),
        text: step.value.clone(),
        table: step.table.as_ref().map(|t| DataTable {
            rows: t.rows.clone(),
        }),
        docstring: step.docstring.clone(),
    }
}

fn convert_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.trim_start_matches('@').to_owned())
        .collect()
}
