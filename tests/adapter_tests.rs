use event_prof::adapter::{MapLocator, SequentialReporter};
use std::collections::HashMap;
use std::time::Duration;

fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn locator() -> MapLocator {
    let mut locator = MapLocator::new();
    locator
        .insert("UserTest", "test_0001_creates", "/app/test/user_test.rb", 4)
        .insert("UserTest", "test_0002_updates", "/app/test/user_test.rb", 11)
        .insert("PostTest", "test_publishes", "/app/test/post_test.rb", 3);
    locator
}

fn run_session(reporter: &mut SequentialReporter<Vec<u8>, MapLocator>) {
    let tests = [
        ("UserTest", "test_0001_creates", 5),
        ("UserTest", "test_0002_updates", 9),
        ("PostTest", "test_publishes", 2),
    ];

    for (group, example, queries) in tests {
        reporter.before_test(group, example);
        for _ in 0..queries {
            reporter.record_event("sql.query", Duration::from_millis(1));
        }
        reporter.after_test();
    }
}

#[test]
fn test_reporter_infers_groups_and_reports() {
    let mut reporter = SequentialReporter::new(
        Vec::new(),
        &options(&[("event", "sql.query"), ("top_count", "2"), ("per_example", "true")]),
        locator(),
    )
    .with_workdir("/app");

    run_session(&mut reporter);
    reporter.report().unwrap();

    let results = reporter.results();
    let result = &results[0];

    assert_eq!(result.groups.names(), vec!["UserTest", "PostTest"]);
    assert_eq!(result.groups.entries[0].location, "./test/user_test.rb");
    assert_eq!(result.groups.entries[0].event_count, 14);

    let examples = result.examples.as_ref().unwrap();
    assert_eq!(examples.names(), vec!["updates", "creates"]);
    assert_eq!(examples.entries[0].location, "./test/user_test.rb:11");

    let output = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(output.contains("EventProf results for sql.query"));
    assert!(output.contains("Total events: 16"));
    assert!(output.contains("updates"));
}

#[test]
fn test_reporter_groups_only() {
    let mut reporter =
        SequentialReporter::new(Vec::new(), &options(&[("event", "sql.query")]), locator())
            .with_workdir("/app");

    run_session(&mut reporter);
    reporter.report().unwrap();

    let result = &reporter.results()[0];
    assert!(result.examples.is_none());
    assert_eq!(result.groups.entries[1].event_count, 2);
}

#[test]
fn test_reporter_missing_event_disables_profiling() {
    let mut reporter = SequentialReporter::new(Vec::new(), &options(&[]), locator());
    assert!(!reporter.is_enabled());

    run_session(&mut reporter);
    reporter.report().unwrap();

    assert!(reporter.into_inner().is_empty());
}

#[test]
fn test_reporter_ignores_other_events() {
    let mut reporter =
        SequentialReporter::new(Vec::new(), &options(&[("event", "sql.query")]), locator());

    reporter.before_test("UserTest", "test_0001_creates");
    reporter.record_event("factory.create", Duration::ZERO);
    reporter.after_test();
    reporter.report().unwrap();

    assert_eq!(reporter.results()[0].totals.event_count, 0);
}
