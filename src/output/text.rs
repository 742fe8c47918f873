//! Human-readable rendering of profile results.

use crate::profiler::{AggregateEntry, ProfileResult, RankingResult};
use std::time::Duration;

const NAME_WIDTH: usize = 36;
const LOCATION_WIDTH: usize = 36;

/// Render one event's result as a text summary
///
/// **Public** - used by the reporter adapter and the `replay` command
pub fn format_result(result: &ProfileResult) -> String {
    let mut lines = Vec::new();
    let totals = &result.totals;

    lines.push(format!("EventProf results for {}", result.event));
    lines.push(String::new());
    lines.push(format!(
        "Total time:   {} of {} ({:.2}%)",
        format_duration(totals.event_time),
        format_duration(totals.run_time),
        totals.time_percentage()
    ));
    lines.push(format!("Total events: {}", totals.event_count));
    if totals.dropped_events > 0 {
        lines.push(format!("Untracked events: {}", totals.dropped_events));
    }

    lines.push(String::new());
    push_ranking(&mut lines, "groups", &result.groups, true);

    if let Some(examples) = &result.examples {
        lines.push(String::new());
        push_ranking(&mut lines, "examples", examples, false);
    }

    lines.join("\n")
}

fn push_ranking(lines: &mut Vec<String>, title: &str, ranking: &RankingResult, groups: bool) {
    lines.push(format!(
        "Top {} {} (by {}):",
        ranking.len(),
        title,
        ranking.rank_by
    ));

    if ranking.is_empty() {
        lines.push("  (none)".to_string());
        return;
    }

    lines.push(String::new());
    lines.push(format!(
        "  {:<nw$} {:<lw$} {:>8} {:>10} {:>10} {:>8}",
        "Name",
        "Location",
        "Events",
        "Time",
        "Run time",
        if groups { "Examples" } else { "Runs" },
        nw = NAME_WIDTH,
        lw = LOCATION_WIDTH,
    ));

    for entry in &ranking.entries {
        lines.push(format_entry(entry, groups));
    }
}

fn format_entry(entry: &AggregateEntry, groups: bool) -> String {
    format!(
        "  {:<nw$} {:<lw$} {:>8} {:>10} {:>10} {:>8}",
        truncate(&entry.name, NAME_WIDTH),
        truncate(&entry.location, LOCATION_WIDTH),
        entry.event_count,
        format_duration(entry.event_time),
        format_duration(entry.run_time),
        if groups { entry.examples } else { entry.runs },
        nw = NAME_WIDTH,
        lw = LOCATION_WIDTH,
    )
}

/// `mm:ss.mmm`
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    format!(
        "{:02}:{:02}.{:03}",
        millis / 60_000,
        (millis / 1000) % 60,
        millis % 1000
    )
}

// Keep the tail: locations are most specific at the end
fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - (width - 3)).collect();
    format!("...{}", tail)
}
