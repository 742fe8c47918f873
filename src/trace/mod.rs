//! Recorded session traces.
//!
//! This module handles:
//! - Parsing JSON Lines session recordings
//! - Replaying them through anything implementing `Lifecycle` + `EventSink`

pub mod record;

pub use record::TraceRecord;

use crate::profiler::{EventSink, EventSource, Lifecycle, RecordedEvents};
use crate::utils::error::TraceError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Counts of what a replay delivered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub groups: usize,
    pub examples: usize,
    pub events: usize,
}

/// Parse a session recording.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
/// * `TraceError::Io` - the reader failed
/// * `TraceError::InvalidRecord` - a line is not a valid record (1-based line number)
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<TraceRecord>, TraceError> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let record = serde_json::from_str(trimmed).map_err(|source| TraceError::InvalidRecord {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }

    debug!("Parsed {} trace records", records.len());
    Ok(records)
}

/// Read and parse a session recording from disk
pub fn read_trace(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>, TraceError> {
    let path = path.as_ref();
    info!("Reading trace: {}", path.display());

    let file = File::open(path)?;
    parse_trace(BufReader::new(file))
}

/// Feed `records` to `target` in order.
///
/// Runs of consecutive events are buffered and delivered before the next
/// lifecycle record, so every event lands in the scope it was recorded in.
pub fn replay<T>(records: &[TraceRecord], target: &mut T) -> ReplayStats
where
    T: Lifecycle + EventSink,
{
    let mut stats = ReplayStats::default();
    let mut pending = RecordedEvents::new();

    for record in records {
        if let TraceRecord::Event { event, .. } = record {
            pending.push(event.as_str(), record.elapsed());
            continue;
        }

        stats.events += pending.emit(&mut *target);

        match record {
            TraceRecord::GroupStarted(group) => {
                stats.groups += 1;
                target.group_started(group);
            }
            TraceRecord::GroupFinished(group) => target.group_finished(group),
            TraceRecord::ExampleStarted(example) => {
                stats.examples += 1;
                target.example_started(example);
            }
            TraceRecord::ExampleFinished(example) => target.example_finished(example),
            TraceRecord::Event { .. } => {}
        }
    }
    stats.events += pending.emit(&mut *target);

    debug!(
        "Replayed {} groups, {} examples, {} events",
        stats.groups, stats.examples, stats.events
    );
    stats
}
