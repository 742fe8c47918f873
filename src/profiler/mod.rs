//! Event profiler core.
//!
//! This module turns lifecycle calls and event notifications into rankings:
//! - `ScopeTracker` keeps the open group and example and attributes events
//! - `Aggregates` folds closed scopes by `(name, location)`
//! - `rank` orders the aggregates into the top-N report
//! - `Profiler` ties the above together for a single tracked event
//!
//! Events fired inside an example count for both the example and its group,
//! so a group's total always covers the examples run inside it plus any
//! group-level setup and teardown.

pub mod aggregate;
pub mod config;
pub mod events;
pub mod ranking;
pub mod scope;
pub mod tracker;

pub use aggregate::{AggregateEntry, Aggregates};
pub use config::{EventRegistry, MergePolicy, ProfilerConfig, RankBy};
pub use events::{measure, EventSink, EventSource, RecordedEvents};
pub use ranking::{rank, ProfileResult, RankingResult, Totals};
pub use scope::{normalize_example_name, ClosedScope, Descriptor, Scope, ScopeKind};
pub use tracker::ScopeTracker;

use crate::utils::config::SYNTHETIC_GROUP_NAME;
use crate::utils::error::{ConfigError, LifecycleError};
use log::{debug, warn};
use std::time::{Duration, Instant};

/// The four lifecycle calls every reporter adapter drives
pub trait Lifecycle {
    fn group_started(&mut self, group: &Descriptor);
    fn group_finished(&mut self, group: &Descriptor);
    fn example_started(&mut self, example: &Descriptor);
    fn example_finished(&mut self, example: &Descriptor);
}

/// Profiler for a single instrumented event.
///
/// Lifecycle calls never fail: out-of-order calls are logged and the
/// tracker state is healed so the host test run is never disturbed.
#[derive(Debug)]
pub struct Profiler {
    event: String,
    rank_by: RankBy,
    top_count: usize,
    per_example: bool,
    tracker: ScopeTracker,
    started_at: Instant,
}

impl Profiler {
    /// Build a profiler for `event` using the remaining settings of `config`
    ///
    /// # Errors
    /// * `ConfigError::UnsupportedEvent` - `event` is not in `registry`
    /// * `ConfigError::InvalidTopCount` - `config.top_count` is out of range
    pub fn for_event(
        event: &str,
        config: &ProfilerConfig,
        registry: &EventRegistry,
    ) -> Result<Self, ConfigError> {
        let single = ProfilerConfig {
            events: vec![event.to_string()],
            ..config.clone()
        };
        single.validate(registry)?;

        debug!(
            "Building profiler for {} (rank by {}, top {}, per example: {})",
            event, config.rank_by, config.top_count, config.per_example
        );

        Ok(Self {
            event: event.to_string(),
            rank_by: config.rank_by,
            top_count: config.top_count,
            per_example: config.per_example,
            tracker: ScopeTracker::new(config.merge_policy),
            started_at: Instant::now(),
        })
    }

    /// Event this profiler listens to
    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn per_example(&self) -> bool {
        self.per_example
    }

    pub fn tracker(&self) -> &ScopeTracker {
        &self.tracker
    }

    /// One occurrence of the tracked event, with no duration
    pub fn on_event(&mut self) {
        self.track(Duration::ZERO);
    }

    /// One occurrence of the tracked event that took `elapsed`
    pub fn track(&mut self, elapsed: Duration) {
        self.tracker.on_event(elapsed);
    }

    /// Ranked groups and, when tracked, examples
    pub fn result(&self) -> ProfileResult {
        let groups = rank(self.tracker.groups().entries(), self.rank_by, self.top_count);
        let examples = self
            .per_example
            .then(|| rank(self.tracker.examples().entries(), self.rank_by, self.top_count));

        ProfileResult {
            event: self.event.clone(),
            rank_by: self.rank_by,
            top_count: self.top_count,
            groups,
            examples,
            totals: Totals {
                event_count: self.tracker.event_count(),
                event_time: self.tracker.event_time(),
                run_time: self.started_at.elapsed(),
                dropped_events: self.tracker.dropped_events(),
            },
        }
    }

    fn report_mismatch(&self, error: LifecycleError) {
        warn!("[{}] {}; recovering", self.event, error);
    }

    fn log_forced(&self, closed: &[ClosedScope]) {
        for scope in closed {
            warn!(
                "[{}] {} `{}` was still open; closed it",
                self.event, scope.kind, scope.name
            );
        }
    }
}

impl Lifecycle for Profiler {
    fn group_started(&mut self, group: &Descriptor) {
        let stale = self.tracker.open_group(group);
        self.log_forced(&stale);
    }

    fn group_finished(&mut self, group: &Descriptor) {
        let Some(current) = self.tracker.active_group() else {
            self.report_mismatch(LifecycleError::GroupNotStarted {
                group: group.name.clone(),
            });
            return;
        };

        if !current.matches(group) {
            let error = LifecycleError::GroupMismatch {
                expected: current.name.clone(),
                found: group.name.clone(),
            };
            self.report_mismatch(error);
        }

        let closed = self.tracker.close_group();
        // Only the group itself is expected here; an example still open is stale
        let stale: Vec<_> = closed
            .into_iter()
            .filter(|scope| scope.kind == ScopeKind::Example)
            .collect();
        self.log_forced(&stale);
    }

    fn example_started(&mut self, example: &Descriptor) {
        if !self.per_example {
            return;
        }

        match self.tracker.open_example(example) {
            Ok(stale) => self.log_forced(stale.as_slice()),
            Err(error) => {
                self.report_mismatch(error);
                let synthetic = Descriptor::new(SYNTHETIC_GROUP_NAME, example.file());
                self.tracker.open_group(&synthetic);
                if let Err(error) = self.tracker.open_example(example) {
                    self.report_mismatch(error);
                }
            }
        }
    }

    fn example_finished(&mut self, example: &Descriptor) {
        if !self.per_example {
            return;
        }

        let Some(current) = self.tracker.active_example() else {
            self.report_mismatch(LifecycleError::NoActiveExample);
            return;
        };

        if !current.matches(example) {
            let error = LifecycleError::ExampleMismatch {
                expected: current.name.clone(),
                found: normalize_example_name(&example.name),
            };
            self.report_mismatch(error);
        }

        if let Err(error) = self.tracker.close_example() {
            self.report_mismatch(error);
        }
    }
}

impl EventSink for Profiler {
    fn notify(&mut self, event: &str, elapsed: Duration) {
        if event == self.event {
            self.track(elapsed);
        }
    }
}

/// One profiler per configured event, driven together
#[derive(Debug)]
pub struct ProfilerSet {
    profilers: Vec<Profiler>,
}

impl ProfilerSet {
    /// Validate `config` and build a profiler for each of its events
    ///
    /// # Errors
    /// Any `ConfigError` from `ProfilerConfig::validate`
    pub fn build(config: &ProfilerConfig, registry: &EventRegistry) -> Result<Self, ConfigError> {
        config.validate(registry)?;

        let profilers = config
            .events
            .iter()
            .map(|event| Profiler::for_event(event, config, registry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { profilers })
    }

    pub fn profilers(&self) -> &[Profiler] {
        &self.profilers
    }

    /// Profiler tracking `event`, if configured
    pub fn get(&self, event: &str) -> Option<&Profiler> {
        self.profilers.iter().find(|p| p.event() == event)
    }

    /// Results in configuration order
    pub fn results(&self) -> Vec<ProfileResult> {
        self.profilers.iter().map(Profiler::result).collect()
    }
}

impl Lifecycle for ProfilerSet {
    fn group_started(&mut self, group: &Descriptor) {
        self.profilers.iter_mut().for_each(|p| p.group_started(group));
    }

    fn group_finished(&mut self, group: &Descriptor) {
        self.profilers.iter_mut().for_each(|p| p.group_finished(group));
    }

    fn example_started(&mut self, example: &Descriptor) {
        self.profilers.iter_mut().for_each(|p| p.example_started(example));
    }

    fn example_finished(&mut self, example: &Descriptor) {
        self.profilers.iter_mut().for_each(|p| p.example_finished(example));
    }
}

impl EventSink for ProfilerSet {
    fn notify(&mut self, event: &str, elapsed: Duration) {
        for profiler in &mut self.profilers {
            profiler.notify(event, elapsed);
        }
    }
}
