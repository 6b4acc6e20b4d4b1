//! Behavioural tests for the reference runner.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gherkin_wire_harness::{
    FixtureProvider, FixtureSet, Runner, StdRunner, StepStatus, TestBody, TestStatus,
};
use rstest::{fixture, rstest};

#[derive(Default)]
struct Counters {
    browsers: Arc<AtomicUsize>,
    databases: Arc<AtomicUsize>,
}

#[fixture]
fn counters() -> Counters {
    Counters::default()
}

fn provider(counters: &Counters) -> FixtureProvider {
    let browsers = Arc::clone(&counters.browsers);
    let databases = Arc::clone(&counters.databases);
    FixtureProvider::new()
        .with("browser", move || {
            browsers.fetch_add(1, Ordering::SeqCst);
            String::from("chromium")
        })
        .with("database", move || {
            databases.fetch_add(1, Ordering::SeqCst);
            Vec::<u32>::new()
        })
}

#[rstest]
fn only_requested_fixtures_are_built(counters: Counters) {
    let mut runner = StdRunner::with_fixtures(provider(&counters));
    runner.test(
        "browser only",
        TestBody::new(FixtureSet::from_iter(["browser"]), |scope| {
            scope.step("Given a browser", &mut |control| {
                let name = control.fixtures().require::<String>("browser")?;
                assert_eq!(name, "chromium");
                assert!(!control.fixtures().contains("database"));
                Ok(())
            })
        }),
    );

    let report = runner.run();
    assert_eq!(report.passed(), 1);
    assert_eq!(counters.browsers.load(Ordering::SeqCst), 1);
    assert_eq!(counters.databases.load(Ordering::SeqCst), 0);
}

#[rstest]
fn every_test_gets_fresh_fixtures(counters: Counters) {
    let mut runner = StdRunner::with_fixtures(provider(&counters));
    for name in ["first", "second"] {
        runner.test(
            name,
            TestBody::new(FixtureSet::from_iter(["database"]), |scope| {
                scope.step("When a row is inserted", &mut |control| {
                    let rows = control.fixtures().require_mut::<Vec<u32>>("database")?;
                    assert!(rows.is_empty(), "fixture state leaked between tests");
                    rows.push(1);
                    Ok(())
                })
            }),
        );
    }

    let report = runner.run();
    assert_eq!(report.passed(), 2);
    assert_eq!(counters.databases.load(Ordering::SeqCst), 2);
}

#[rstest]
fn hook_fixtures_are_merged_with_test_fixtures(counters: Counters) {
    let mut runner = StdRunner::with_fixtures(provider(&counters));
    runner.describe("group", &mut |group| {
        group.before_each(TestBody::new(FixtureSet::from_iter(["database"]), |scope| {
            scope.step("Given a database", &mut |control| {
                control.fixtures().require_mut::<Vec<u32>>("database")?.push(7);
                Ok(())
            })
        }));
        group.test(
            "reads seeded row",
            TestBody::new(FixtureSet::from_iter(["browser"]), |scope| {
                scope.step("Then the row is visible", &mut |control| {
                    let rows = control.fixtures().require::<Vec<u32>>("database")?;
                    assert_eq!(rows.as_slice(), [7]);
                    Ok(())
                })
            }),
        );
    });

    let report = runner.run();
    assert_eq!(report.passed(), 1, "report: {report:?}");
    assert_eq!(counters.browsers.load(Ordering::SeqCst), 1);
}

#[test]
fn failing_step_stops_the_test_and_records_the_failure() {
    let mut runner = StdRunner::new();
    runner.test(
        "fails",
        TestBody::new(FixtureSet::new(), |scope| {
            scope.step("When it fails", &mut |_| Err("broken".into()))?;
            scope.step("Then never runs", &mut |_| Ok(()))
        }),
    );

    let report = runner.run();
    let Some(record) = report.test("fails") else {
        panic!("test should be recorded");
    };
    assert_eq!(
        record.status(),
        &TestStatus::Failed {
            message: "broken".into()
        }
    );
    assert_eq!(record.step_labels(), ["When it fails"]);
    assert_eq!(
        record.steps().first().map(|s| s.status()),
        Some(&StepStatus::Failed {
            message: "broken".into()
        })
    );
}

#[test]
fn missing_fixture_error_surfaces_through_the_step() {
    let mut runner = StdRunner::new().with_strict_fixtures(false);
    runner.test(
        "lenient",
        TestBody::new(FixtureSet::from_iter(["ghost"]), |scope| {
            scope.step("Given a ghost", &mut |control| {
                control.fixtures().require::<u8>("ghost")?;
                Ok(())
            })
        }),
    );

    let report = runner.run();
    assert_eq!(
        report.test("lenient").map(|t| t.status()),
        Some(&TestStatus::Failed {
            message: "fixture 'ghost' was not requested for this test".into()
        })
    );
}
