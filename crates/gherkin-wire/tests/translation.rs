//! End-to-end translation of parsed feature text onto the reference runner.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use gherkin_wire::{
    Document, HandlerRegistry, Signature, StepError, StepLookup, Translator,
    clear_fail_on_unresolved_override, set_fail_on_unresolved, translate,
};
use gherkin_wire_harness::{
    FixtureProvider, RunReport, StdRunner, StepRecord, StepStatus, TestRecord, TestStatus,
};
use rstest::{fixture, rstest};
use serial_test::serial;

type Journal = Arc<Mutex<Vec<String>>>;

fn record(journal: &Journal, entry: impl Into<String>) {
    journal
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(entry.into());
}

fn entries(journal: &Journal) -> Vec<String> {
    journal
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn parse(text: &str) -> Document {
    match Document::parse_str(text) {
        Ok(document) => document,
        Err(err) => panic!("feature text should parse: {err}"),
    }
}

fn register(result: Result<gherkin_wire::HandlerId, gherkin_wire::RegistryError>) {
    if let Err(err) = result {
        panic!("handler registration should succeed: {err}");
    }
}

fn outcome<'a>(report: &'a RunReport, name: &str) -> &'a TestRecord {
    match report.test(name) {
        Some(record) => record,
        None => panic!("test '{name}' should have run"),
    }
}

struct Shop {
    registry: HandlerRegistry,
    journal: Journal,
}

#[fixture]
fn shop() -> Shop {
    let journal = Journal::default();
    let mut registry = HandlerRegistry::new();

    let log = Arc::clone(&journal);
    register(registry.given("the shop is open", Signature::none(), move |_, args| {
        record(&log, args.text());
        Ok(())
    }));
    let log = Arc::clone(&journal);
    register(registry.when(
        "I buy {count} {item}",
        Signature::source("({ basket }) => {}"),
        move |fixtures, args| {
            let count: usize = args.arg(0)?;
            let item: String = args.arg(1)?;
            record(&log, format!("buy {count} {item}"));
            fixtures
                .require_mut::<Vec<String>>("basket")?
                .extend(std::iter::repeat_n(item, count));
            Ok(())
        },
    ));
    register(registry.then(
        "the basket holds {count} items",
        Signature::fixtures(["basket"]),
        |fixtures, args| {
            let expected: usize = args.arg(0)?;
            let actual = fixtures.require::<Vec<String>>("basket")?.len();
            if actual == expected {
                Ok(())
            } else {
                Err(StepError::failed(format!(
                    "expected {expected} items, found {actual}"
                )))
            }
        },
    ));
    Shop { registry, journal }
}

fn runner() -> StdRunner {
    StdRunner::with_fixtures(FixtureProvider::new().with("basket", Vec::<String>::new))
        .with_strict_fixtures(true)
}

fn install(document: &Document, registry: &HandlerRegistry) -> StdRunner {
    let mut runner = runner();
    Translator::new(registry)
        .with_fail_on_unresolved(false)
        .plan(document)
        .install(&mut runner);
    runner
}

#[rstest]
fn background_runs_before_every_scenario(shop: Shop) {
    let document = parse(
        "Feature: Shop
  Background:
    Given the shop is open

  Scenario: Apples
    When I buy 2 apple
    Then the basket holds 2 items

  Scenario: Pears
    When I buy 1 pear
",
    );
    let report = install(&document, &shop.registry).run();

    assert_eq!(report.passed(), 2);
    assert_eq!(
        entries(&shop.journal),
        ["the shop is open", "buy 2 apple", "the shop is open", "buy 1 pear"]
    );
    assert_eq!(
        outcome(&report, "Apples").step_labels(),
        [
            "Given the shop is open",
            "When I buy 2 apple",
            "Then the basket holds 2 items"
        ]
    );
}

#[rstest]
fn outline_rows_become_numbered_tests(shop: Shop) {
    let document = parse(
        "Feature: Shop
  Scenario Outline: Buying
    When I buy <count> <item>
    Then the basket holds <count> items

    Examples: fruit
      | count | item  |
      | 1     | apple |
      | 3     | pear  |

    Examples:
      | count | item |
      | 2     | fig  |
",
    );
    let runner = install(&document, &shop.registry);
    assert_eq!(
        runner.titles(),
        [
            "Shop > Buying -- fruit (1)",
            "Shop > Buying -- fruit (2)",
            "Shop > Buying (1)"
        ]
    );

    let report = runner.run();
    assert_eq!(report.passed(), 3);
    assert_eq!(
        entries(&shop.journal),
        ["buy 1 apple", "buy 3 pear", "buy 2 fig"]
    );
    assert_eq!(
        outcome(&report, "Buying -- fruit (2)").step_labels(),
        ["When I buy 3 pear", "Then the basket holds 3 items"]
    );
}

#[rstest]
fn unresolved_steps_are_skipped_and_later_steps_still_run(shop: Shop) {
    let document = parse(
        "Feature: Shop
  Scenario: Missing
    Given the shop is open
    When I haggle
    And I buy 1 apple
",
    );
    let report = install(&document, &shop.registry).run();
    let record = outcome(&report, "Missing");

    assert_eq!(record.status(), &TestStatus::Skipped);
    let statuses: Vec<&StepStatus> = record.steps().iter().map(StepRecord::status).collect();
    assert_eq!(
        statuses,
        [
            &StepStatus::Passed,
            &StepStatus::Skipped {
                message: "No handler found for step 'When I haggle'. Add one using HandlerRegistry::when"
                    .into()
            },
            &StepStatus::Passed,
        ]
    );
    assert_eq!(
        entries(&shop.journal),
        ["the shop is open", "buy 1 apple"],
        "the conjunction inherits When from the unresolved step before it"
    );
}

#[rstest]
fn leading_conjunction_is_skipped_as_an_anomaly(shop: Shop) {
    let document = parse(
        "Feature: Shop
  Scenario: Dangling
    And the shop is open
    When I buy 1 apple
",
    );
    let plan = Translator::new(&shop.registry).plan(&document);
    assert_eq!(plan.anomalies().len(), 1);

    let mut runner = runner();
    plan.install(&mut runner);
    let report = runner.run();
    let record = outcome(&report, "Dangling");

    assert!(matches!(
        record.steps().first().map(StepRecord::status),
        Some(StepStatus::Skipped { message }) if message.contains("'And the shop is open'")
    ));
    assert_eq!(
        entries(&shop.journal),
        ["buy 1 apple"],
        "the leading step must not run under a guessed keyword"
    );
}

#[rstest]
#[serial]
fn fail_on_unresolved_fails_the_scenario(shop: Shop) {
    set_fail_on_unresolved(true);
    let document = parse(
        "Feature: Shop
  Scenario: Strict
    Then the receipt is printed
    When I buy 1 apple

  Scenario: Fine
    When I buy 1 pear
",
    );
    let mut runner = runner();
    translate(&document, Some(&shop.registry as &dyn StepLookup), &mut runner);
    clear_fail_on_unresolved_override();
    let report = runner.run();

    assert!(matches!(
        outcome(&report, "Strict").status(),
        TestStatus::Failed { message } if message.contains("HandlerRegistry::then")
    ));
    assert_eq!(
        outcome(&report, "Fine").status(),
        &TestStatus::Passed,
        "other scenarios are unaffected"
    );
    assert_eq!(entries(&shop.journal), ["buy 1 pear"]);
}

#[rstest]
fn handler_failure_fails_only_its_scenario(shop: Shop) {
    let document = parse(
        "Feature: Shop
  Scenario: Wrong count
    When I buy 1 apple
    Then the basket holds 5 items

  Scenario: Right count
    When I buy 2 apple
    Then the basket holds 2 items
",
    );
    let report = install(&document, &shop.registry).run();

    assert_eq!(
        outcome(&report, "Wrong count").status(),
        &TestStatus::Failed {
            message: "expected 5 items, found 1".into()
        }
    );
    assert_eq!(outcome(&report, "Right count").status(), &TestStatus::Passed);
}

#[test]
fn only_fixtures_declared_by_resolved_handlers_are_built() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let provider = FixtureProvider::new()
        .with("browser", || String::from("chromium"))
        .with("page", || 0_u32)
        .with("database", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    let mut registry = HandlerRegistry::new();
    register(registry.given(
        "a browser",
        Signature::source("fn open(Ctx { browser, .. }: Ctx)"),
        |fixtures, _| fixtures.require::<String>("browser").map(|_| ()).map_err(Into::into),
    ));
    register(registry.when(
        "I open a page",
        Signature::source("async ({ browser, page }) => {}"),
        |fixtures, _| {
            *fixtures.require_mut::<u32>("page")? += 1;
            Ok(())
        },
    ));
    register(registry.then(
        "the database is empty",
        Signature::fixtures(["database"]),
        |_, _| Ok(()),
    ));

    let document = parse(
        "Feature: Browsing
  Scenario: Open
    Given a browser
    When I open a page
    Then the database is clean
",
    );
    let plan = Translator::new(&registry)
        .with_fail_on_unresolved(false)
        .plan(&document);
    let mut runner = StdRunner::with_fixtures(provider).with_strict_fixtures(true);
    plan.install(&mut runner);
    let report = runner.run();

    assert_eq!(report.skipped(), 1, "the last step has no handler");
    assert_eq!(report.failed(), 0);
    assert_eq!(
        built.load(Ordering::SeqCst),
        0,
        "no resolved handler declared the database fixture"
    );
}

#[rstest]
fn rules_nest_groups_and_scope_their_backgrounds(shop: Shop) {
    let document = parse(
        "Feature: Shop
  Scenario: Outside
    When I buy 1 apple

  Rule: Opening hours
    Background:
      Given the shop is open

    Scenario: Inside
      When I buy 1 pear
",
    );
    let runner = install(&document, &shop.registry);
    assert_eq!(runner.titles(), ["Shop > Outside", "Shop > Opening hours > Inside"]);
    assert_eq!(runner.hook_count(), 1);

    let report = runner.run();
    assert_eq!(outcome(&report, "Outside").step_labels(), ["When I buy 1 apple"]);
    assert_eq!(
        outcome(&report, "Inside").step_labels(),
        ["Given the shop is open", "When I buy 1 pear"]
    );
}

#[test]
fn tables_and_docstrings_reach_the_handler() {
    let seen = Journal::default();
    let log = Arc::clone(&seen);
    let mut registry = HandlerRegistry::new();
    register(registry.given("these users", Signature::none(), move |_, args| {
        let rows = args.table().map(|t| t.rows.len()).unwrap_or_default();
        record(&log, format!("rows={rows}"));
        record(&log, args.docstring().map_or("none", str::trim));
        Ok(())
    }));

    let document = parse(
        "Feature: Users
  Scenario: Table
    Given these users
      | name  |
      | alice |
      | bob   |

  Scenario: Doc
    Given these users
      \"\"\"
      hello
      \"\"\"
",
    );
    let report = install(&document, &registry).run();
    assert_eq!(report.passed(), 2);
    assert_eq!(entries(&seen), ["rows=3", "none", "rows=0", "hello"]);
}
