//! Session-wide aggregates keyed by `(name, location)`.
//!
//! A scope can run several times in one session (shared examples,
//! re-opened groups). Each close folds into the entry for its key,
//! and entries keep the order in which their key was first seen so
//! rankings can break ties deterministically.

use super::config::MergePolicy;
use super::scope::{ClosedScope, ScopeKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// One row of the final report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub name: String,
    pub location: String,

    /// Events fired while the scope was open, across all runs
    pub event_count: u64,

    /// Time spent inside those events
    #[serde(with = "secs")]
    pub event_time: Duration,

    /// Wall time the scope was open
    #[serde(with = "secs")]
    pub run_time: Duration,

    /// How many times the scope ran
    pub runs: u64,

    /// Examples run inside the scope (groups only)
    pub examples: u64,
}

impl AggregateEntry {
    fn from_closed(closed: &ClosedScope) -> Self {
        Self {
            name: closed.name.clone(),
            location: closed.location.clone(),
            event_count: closed.event_count,
            event_time: closed.event_time,
            run_time: closed.run_time,
            runs: 1,
            examples: closed.examples,
        }
    }

    fn merge(&mut self, closed: &ClosedScope, policy: MergePolicy) {
        match policy {
            MergePolicy::Sum => {
                self.event_count = self.event_count.saturating_add(closed.event_count);
                self.event_time = self.event_time.saturating_add(closed.event_time);
                self.run_time = self.run_time.saturating_add(closed.run_time);
            }
            MergePolicy::Max => {
                self.event_count = self.event_count.max(closed.event_count);
                self.event_time = self.event_time.max(closed.event_time);
                self.run_time = self.run_time.max(closed.run_time);
            }
        }
        self.runs += 1;
        self.examples += closed.examples;
    }
}

/// Insertion-ordered aggregate table
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    entries: Vec<AggregateEntry>,
    index: HashMap<ScopeKey, usize>,
    policy: MergePolicy,
}

impl Aggregates {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            policy,
        }
    }

    /// Fold a closed scope into the entry for its key
    pub fn record(&mut self, closed: &ClosedScope) {
        match self.index.get(&closed.key()) {
            Some(&i) => self.entries[i].merge(closed, self.policy),
            None => {
                self.index.insert(closed.key(), self.entries.len());
                self.entries.push(AggregateEntry::from_closed(closed));
            }
        }
    }

    pub fn get(&self, name: &str, location: &str) -> Option<&AggregateEntry> {
        let key = ScopeKey {
            name: name.to_string(),
            location: location.to_string(),
        };
        self.index.get(&key).map(|&i| &self.entries[i])
    }

    /// Entries in first-seen order
    pub fn entries(&self) -> &[AggregateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialize durations as fractional seconds
pub(crate) mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::scope::ScopeKind;

    fn closed(name: &str, location: &str, count: u64) -> ClosedScope {
        ClosedScope {
            kind: ScopeKind::Example,
            name: name.to_string(),
            location: location.to_string(),
            event_count: count,
            event_time: Duration::from_millis(count * 10),
            run_time: Duration::from_millis(100),
            examples: 0,
        }
    }

    #[test]
    fn test_repeated_runs_sum() {
        let mut aggregates = Aggregates::new(MergePolicy::Sum);
        aggregates.record(&closed("a", "x.rb:1", 3));
        aggregates.record(&closed("a", "x.rb:1", 5));

        let entry = aggregates.get("a", "x.rb:1").unwrap();
        assert_eq!(entry.event_count, 8);
        assert_eq!(entry.runs, 2);
        assert_eq!(entry.event_time, Duration::from_millis(80));
        assert_eq!(aggregates.len(), 1);
    }

    #[test]
    fn test_repeated_runs_max() {
        let mut aggregates = Aggregates::new(MergePolicy::Max);
        aggregates.record(&closed("a", "x.rb:1", 3));
        aggregates.record(&closed("a", "x.rb:1", 5));
        aggregates.record(&closed("a", "x.rb:1", 4));

        let entry = aggregates.get("a", "x.rb:1").unwrap();
        assert_eq!(entry.event_count, 5);
        assert_eq!(entry.runs, 3);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let mut huge = closed("a", "x.rb:1", 1);
        huge.event_time = Duration::MAX;
        huge.run_time = Duration::MAX;

        let mut aggregates = Aggregates::new(MergePolicy::Sum);
        aggregates.record(&huge);
        aggregates.record(&huge);

        let entry = aggregates.get("a", "x.rb:1").unwrap();
        assert_eq!(entry.event_time, Duration::MAX);
        assert_eq!(entry.run_time, Duration::MAX);
        assert_eq!(entry.runs, 2);
    }

    #[test]
    fn test_same_name_different_location() {
        let mut aggregates = Aggregates::new(MergePolicy::Sum);
        aggregates.record(&closed("a", "x.rb:1", 3));
        aggregates.record(&closed("a", "y.rb:1", 5));
        assert_eq!(aggregates.len(), 2);
    }

    #[test]
    fn test_first_seen_order() {
        let mut aggregates = Aggregates::new(MergePolicy::Sum);
        aggregates.record(&closed("b", "x.rb:2", 1));
        aggregates.record(&closed("a", "x.rb:1", 1));
        aggregates.record(&closed("b", "x.rb:2", 1));

        let names: Vec<_> = aggregates.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
