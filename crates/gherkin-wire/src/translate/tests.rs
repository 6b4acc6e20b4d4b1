//! Unit tests for plan construction.

use super::*;
use crate::args::StepArgs;
use crate::document::{ExampleTable, Step};
use crate::error::StepError;
use crate::keyword::StepKeyword;
use crate::resolver::Anomaly;
use crate::signature::Signature;
use gherkin_wire_harness::Fixtures;
use rstest::{fixture, rstest};

fn noop(_: &mut Fixtures, _: &StepArgs<'_>) -> Result<(), StepError> {
    Ok(())
}

#[fixture]
fn registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    for result in [
        registry.given("a shop", Signature::fixtures(["shop"]), noop),
        registry.when("I buy {count} {item}", Signature::fixtures(["basket"]), noop),
        registry.then("I own {count} {item}", Signature::none(), noop),
    ] {
        assert!(result.is_ok());
    }
    registry
}

fn document() -> Document {
    let outline = Scenario {
        name: "Buying".into(),
        steps: vec![
            Step::new(StepKeyword::When, "I buy <count> <item>"),
            Step::new(StepKeyword::Then, "I own <count> <item>"),
        ],
        examples: vec![ExampleTable {
            name: "fruit".into(),
            header: Some(vec!["count".into(), "item".into()]),
            rows: vec![
                vec!["1".into(), "apple".into()],
                vec!["2".into(), "pears".into()],
            ],
        }],
        ..Scenario::default()
    };
    let rule = Rule {
        name: "Refunds".into(),
        tags: Vec::new(),
        children: vec![RuleChild::Scenario(Scenario {
            name: "Orphan".into(),
            steps: vec![Step::new(StepKeyword::And, "a shop")],
            ..Scenario::default()
        })],
    };
    Document::from(Feature {
        name: "Shop".into(),
        tags: Vec::new(),
        children: vec![
            FeatureChild::Background(Background {
                name: String::new(),
                steps: vec![Step::new(StepKeyword::Given, "a shop")],
            }),
            FeatureChild::Scenario(outline),
            FeatureChild::Rule(rule),
        ],
    })
}

fn shape(nodes: &[PlanNode]) -> Vec<String> {
    nodes
        .iter()
        .map(|node| match node {
            PlanNode::Group { name, children } => format!("{name}[{}]", shape(children).join(", ")),
            PlanNode::Background(_) => "background".to_owned(),
            PlanNode::Test(program) => program.name().to_owned(),
        })
        .collect()
}

#[rstest]
fn plan_mirrors_document_structure(registry: HandlerRegistry) {
    let plan = Translator::new(&registry).plan(&document());
    assert_eq!(
        shape(plan.nodes()),
        ["Shop[background, Buying -- fruit (1), Buying -- fruit (2), Refunds[Orphan]]"]
    );
    assert_eq!(plan.test_count(), 3);
}

#[rstest]
fn anomalies_carry_their_location(registry: HandlerRegistry) {
    let plan = Translator::new(&registry).plan(&document());
    assert_eq!(
        plan.anomalies(),
        [PlanAnomaly {
            path: vec!["Shop".into(), "Refunds".into(), "Orphan".into()],
            anomaly: Anomaly::LeadingConjunction {
                label: "And a shop".into()
            },
        }]
    );
}

#[rstest]
fn unnamed_backgrounds_do_not_extend_the_path(registry: HandlerRegistry) {
    let document = Document::from(Feature {
        name: "Shop".into(),
        tags: Vec::new(),
        children: vec![FeatureChild::Background(Background {
            name: String::new(),
            steps: vec![Step::new(StepKeyword::But, "a shop")],
        })],
    });
    let anomalies = Translator::new(&registry).plan(&document).anomalies();
    assert_eq!(
        anomalies.iter().map(|a| a.path.clone()).collect::<Vec<_>>(),
        [vec!["Shop".to_owned()]]
    );
}

#[rstest]
fn translator_propagates_the_unresolved_policy(registry: HandlerRegistry) {
    let plan = Translator::new(&registry)
        .with_fail_on_unresolved(true)
        .plan(&document());
    let mut programs = Vec::new();
    collect_programs(plan.nodes(), &mut programs);
    assert!(!programs.is_empty());
    assert!(programs.iter().all(|p| p.fails_on_unresolved()));
}

fn collect_programs<'a>(nodes: &'a [PlanNode], out: &mut Vec<&'a ScenarioProgram>) {
    for node in nodes {
        match node {
            PlanNode::Group { children, .. } => collect_programs(children, out),
            PlanNode::Background(program) | PlanNode::Test(program) => out.push(program),
        }
    }
}

#[cfg(feature = "diagnostics")]
#[rstest]
fn summary_serializes_resolution_details(registry: HandlerRegistry) {
    let plan = Translator::new(&registry).plan(&document());
    let summary = plan.summary();
    assert_eq!(summary.tests, 3);
    assert_eq!(summary.unresolved, 1);

    let json = match plan.to_json() {
        Ok(json) => json,
        Err(err) => panic!("plan should serialize: {err}"),
    };
    let value: serde_json::Value = match serde_json::from_str(&json) {
        Ok(value) => value,
        Err(err) => panic!("summary should be valid JSON: {err}"),
    };
    let first_test_step = value
        .pointer("/features/0/children/1/steps/0")
        .cloned()
        .unwrap_or_default();
    assert_eq!(
        first_test_step.get("pattern").and_then(serde_json::Value::as_str),
        Some("I buy {count} {item}")
    );
    assert_eq!(
        first_test_step.get("captures"),
        Some(&serde_json::json!(["1", "apple"]))
    );
    assert_eq!(
        value
            .pointer("/features/0/children/3/children/0/steps/0/anomaly/kind")
            .and_then(serde_json::Value::as_str),
        Some("leading_conjunction")
    );
    assert_eq!(
        value
            .pointer("/features/0/children/0/kind")
            .and_then(serde_json::Value::as_str),
        Some("background")
    );
}
