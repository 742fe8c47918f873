use event_prof::output::{format_result, read_report, report_to_string, write_report, Report};
use event_prof::profiler::{
    Descriptor, EventRegistry, EventSink, Lifecycle, ProfileResult, Profiler, ProfilerConfig,
};
use std::time::Duration;
use tempfile::tempdir;

fn sample_result() -> ProfileResult {
    let config = ProfilerConfig::new("sql.query").with_per_example(true);
    let mut profiler = Profiler::for_event("sql.query", &config, &EventRegistry::new()).unwrap();

    let group = Descriptor::new("UserTest", "./test/user_test.rb");
    let example = Descriptor::new("test_0001_creates", "./test/user_test.rb:4");

    profiler.group_started(&group);
    profiler.example_started(&example);
    profiler.notify("sql.query", Duration::from_millis(250));
    profiler.notify("sql.query", Duration::from_millis(250));
    profiler.example_finished(&example);
    profiler.group_finished(&group);

    profiler.result()
}

#[test]
fn test_report_roundtrip_keeps_metrics() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");

    write_report(&Report::new(vec![sample_result()]), &path).unwrap();
    let report = read_report(&path).unwrap();

    let result = &report.results[0];
    assert_eq!(result.event, "sql.query");
    assert_eq!(result.groups.entries[0].event_count, 2);
    assert_eq!(result.groups.entries[0].event_time, Duration::from_millis(500));
    assert_eq!(result.examples.as_ref().unwrap().entries[0].name, "creates");
}

#[test]
fn test_report_json_uses_seconds() {
    let json = report_to_string(&Report::new(vec![sample_result()])).unwrap();
    assert!(json.contains("\"event_time\": 0.5"));
    assert!(json.contains("\"rank_by\": \"count\""));
}

#[test]
fn test_format_result_lists_group_and_example() {
    let text = format_result(&sample_result());

    assert!(text.contains("Total events: 2"));
    assert!(text.contains("Top 1 groups (by count):"));
    assert!(text.contains("Top 1 examples (by count):"));
    assert!(text.contains("./test/user_test.rb:4"));
    assert!(text.contains("00:00.500"));
}

#[test]
fn test_read_report_rejects_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(read_report(&path).is_err());
}
