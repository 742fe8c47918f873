//! Ranking of aggregate entries into the final result.

use super::aggregate::{secs, AggregateEntry};
use super::config::RankBy;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top entries ordered by the rank criterion, descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub rank_by: RankBy,
    pub entries: Vec<AggregateEntry>,
}

impl RankingResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in rank order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

/// Rank `entries` by `rank_by` and keep the first `top_count`.
///
/// `entries` must be in first-seen order: the sort is stable, so exact
/// ties keep the scope that was seen first ahead.
///
/// # Example
/// ```ignore
/// let ranking = rank(tracker.groups().entries(), RankBy::Count, 5);
/// ```
pub fn rank(entries: &[AggregateEntry], rank_by: RankBy, top_count: usize) -> RankingResult {
    debug!(
        "Ranking {} entries by {} (top {})",
        entries.len(),
        rank_by,
        top_count
    );

    let mut sorted: Vec<AggregateEntry> = entries.to_vec();
    match rank_by {
        RankBy::Count => sorted.sort_by(|a, b| b.event_count.cmp(&a.event_count)),
        RankBy::Time => sorted.sort_by(|a, b| b.event_time.cmp(&a.event_time)),
    }
    sorted.truncate(top_count);

    RankingResult {
        rank_by,
        entries: sorted,
    }
}

/// Session totals for one event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Events attributed to any group
    pub event_count: u64,

    /// Time spent in those events
    #[serde(with = "secs")]
    pub event_time: Duration,

    /// Wall time since the profiler was built
    #[serde(with = "secs")]
    pub run_time: Duration,

    /// Events fired while no group was open
    pub dropped_events: u64,
}

impl Totals {
    /// Share of the run spent inside events, in percent.
    ///
    /// Capped at 100: replayed sessions carry recorded event times that
    /// can exceed the wall time of the replay itself.
    pub fn time_percentage(&self) -> f64 {
        if self.run_time.is_zero() {
            0.0
        } else {
            (self.event_time.as_secs_f64() / self.run_time.as_secs_f64() * 100.0).min(100.0)
        }
    }
}

/// Everything a formatter needs to report on one event
///
/// **Public** - returned by `Profiler::result`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResult {
    pub event: String,
    pub rank_by: RankBy,
    pub top_count: usize,
    pub groups: RankingResult,

    /// Present only when examples are tracked individually
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub examples: Option<RankingResult>,

    pub totals: Totals,
}
