//! Unit tests for handler registration and lookup.

use super::*;
use crate::error::PatternError;
use rstest::{fixture, rstest};

fn noop(_: &mut Fixtures, _: &StepArgs<'_>) -> Result<(), StepError> {
    Ok(())
}

#[fixture]
fn registry() -> HandlerRegistry {
    HandlerRegistry::new()
}

fn resolved_pattern(
    registry: &HandlerRegistry,
    keyword: StepKeyword,
    text: &str,
) -> Option<String> {
    registry
        .resolve(keyword, text)
        .map(|r| r.handler().pattern().as_str().to_owned())
}

#[rstest]
fn exact_pattern_beats_placeholder_pattern(mut registry: HandlerRegistry) {
    assert!(registry.given("the output is {value}", Signature::none(), noop).is_ok());
    assert!(registry.given("the output is foo", Signature::none(), noop).is_ok());
    assert_eq!(
        resolved_pattern(&registry, StepKeyword::Given, "the output is foo").as_deref(),
        Some("the output is foo")
    );
    assert_eq!(
        resolved_pattern(&registry, StepKeyword::Given, "the output is bar").as_deref(),
        Some("the output is {value}")
    );
}

#[rstest]
fn escaped_braces_match_only_their_literal_text(mut registry: HandlerRegistry) {
    assert!(registry.given("a {{b}} block", Signature::none(), noop).is_ok());
    assert_eq!(
        resolved_pattern(&registry, StepKeyword::Given, "a {b} block").as_deref(),
        Some("a {{b}} block")
    );
    assert!(registry.resolve(StepKeyword::Given, "a {{b}} block").is_none());
}

#[rstest]
fn most_specific_placeholder_pattern_wins(mut registry: HandlerRegistry) {
    assert!(registry.when("I {verb} {thing}", Signature::none(), noop).is_ok());
    assert!(registry.when("I buy {thing}", Signature::none(), noop).is_ok());
    let resolved = registry.resolve(StepKeyword::When, "I buy apples");
    assert_eq!(
        resolved.as_ref().map(|r| r.handler().pattern().as_str()),
        Some("I buy {thing}")
    );
    assert_eq!(
        resolved.as_ref().map(ResolvedHandler::captures),
        Some(&["apples".to_owned()][..])
    );
}

#[rstest]
fn lookup_is_scoped_to_the_keyword(mut registry: HandlerRegistry) {
    assert!(registry.then("it works", Signature::none(), noop).is_ok());
    assert!(registry.resolve(StepKeyword::Given, "it works").is_none());
    assert!(registry.resolve(StepKeyword::Then, "it works").is_some());
}

#[rstest]
fn duplicate_patterns_are_rejected(mut registry: HandlerRegistry) {
    assert!(registry.given("a user", Signature::none(), noop).is_ok());
    assert!(matches!(
        registry.given("a user", Signature::none(), noop),
        Err(RegistryError::Duplicate { keyword: StepKeyword::Given, .. })
    ));
    assert!(registry.when("a user", Signature::none(), noop).is_ok());
    assert_eq!(registry.len(), 2);
}

#[rstest]
fn invalid_patterns_are_rejected(mut registry: HandlerRegistry) {
    assert!(matches!(
        registry.given("broken {", Signature::none(), noop),
        Err(RegistryError::InvalidPattern {
            source: PatternError::Placeholder { .. },
            ..
        })
    ));
    assert!(registry.is_empty());
}

#[rstest]
#[case(StepKeyword::And)]
#[case(StepKeyword::But)]
fn conjunction_keywords_cannot_register(
    mut registry: HandlerRegistry,
    #[case] keyword: StepKeyword,
) {
    assert!(matches!(
        registry.register(keyword, "anything", Signature::none(), noop),
        Err(RegistryError::Conjunction { .. })
    ));
}

#[rstest]
fn fixtures_are_memoised_per_registered_handler(mut registry: HandlerRegistry) {
    let id = match registry.given(
        "a page",
        Signature::source("({ browser, page }) => {}"),
        noop,
    ) {
        Ok(id) => id,
        Err(err) => panic!("registration should succeed: {err}"),
    };
    let Some(handler) = registry.get(id) else {
        panic!("handler should be stored");
    };
    assert!(!registry.analyzer().is_cached(id));
    let first = registry.fixtures(handler);
    let second = registry.fixtures(handler);
    assert!(registry.analyzer().is_cached(id));
    assert_eq!(first.names().collect::<Vec<_>>(), ["browser", "page"]);
    assert_eq!(
        first.names().collect::<Vec<_>>(),
        second.names().collect::<Vec<_>>()
    );
}

#[rstest]
fn foreign_handlers_are_analysed_without_touching_the_cache(mut registry: HandlerRegistry) {
    let mut other = HandlerRegistry::new();
    let foreign = other.given("x", Signature::fixtures(["db"]), noop);
    assert!(registry.given("y", Signature::fixtures(["web"]), noop).is_ok());
    let Some(handler) = foreign.ok().and_then(|id| other.get(id)) else {
        panic!("foreign handler should exist");
    };
    assert_eq!(
        registry.fixtures(handler).names().collect::<Vec<_>>(),
        ["db"]
    );
    assert!(!registry.analyzer().is_cached(HandlerId::new(0)));
}

#[rstest]
fn invoke_passes_captures_and_payloads(mut registry: HandlerRegistry) {
    let registered = registry.when(
        "I add {n} items",
        Signature::fixtures(["basket"]),
        |fixtures, args| {
            let n: usize = args.arg(0)?;
            let extra = args.table().map_or(0, |t| t.rows.len());
            fixtures.require_mut::<Vec<usize>>("basket")?.push(n + extra);
            Ok(())
        },
    );
    assert!(registered.is_ok());

    let Some(resolved) = registry.resolve(StepKeyword::When, "I add 2 items") else {
        panic!("handler should resolve");
    };
    let mut fixtures = Fixtures::new();
    fixtures.insert("basket", Vec::<usize>::new());
    let table = crate::document::DataTable {
        rows: vec![vec!["a".into()]],
    };
    let args = StepArgs::new("I add 2 items", resolved.captures(), Some(&table), None);
    assert!(resolved.handler().invoke(&mut fixtures, &args).is_ok());
    assert_eq!(fixtures.get::<Vec<usize>>("basket"), Some(&vec![3]));
}
