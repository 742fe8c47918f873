//! Tracks the open group and example and routes events to them.
//!
//! At most one group and one example are open at any time, and an
//! example is always nested in the open group. Closing a scope folds
//! it into the session aggregates.

use super::aggregate::Aggregates;
use super::config::MergePolicy;
use super::scope::{ClosedScope, Descriptor, Scope, ScopeKind};
use crate::utils::error::LifecycleError;
use log::debug;
use std::time::Duration;

/// Open-scope bookkeeping plus the aggregates it feeds
///
/// **Public** - owned by `Profiler`, usable on its own
#[derive(Debug, Default)]
pub struct ScopeTracker {
    group: Option<Scope>,
    example: Option<Scope>,
    groups: Aggregates,
    examples: Aggregates,

    /// Events attributed to a group, counted once each
    event_count: u64,
    event_time: Duration,

    /// Events that arrived with no group open
    dropped: u64,
}

impl ScopeTracker {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            groups: Aggregates::new(policy),
            examples: Aggregates::new(policy),
            ..Default::default()
        }
    }

    pub fn active_group(&self) -> Option<&Scope> {
        self.group.as_ref()
    }

    pub fn active_example(&self) -> Option<&Scope> {
        self.example.as_ref()
    }

    /// Open a group.
    ///
    /// A stale group with a different name is force-closed first (together
    /// with its open example, if any) and returned. Re-opening the group
    /// that is already open keeps it running.
    pub fn open_group(&mut self, descriptor: &Descriptor) -> Vec<ClosedScope> {
        let mut closed = Vec::new();

        if let Some(current) = &self.group {
            if current.name == descriptor.name {
                debug!("Group already open: {}", descriptor);
                return closed;
            }
            debug!("Force-closing stale group: {}", current.name);
            closed.extend(self.close_open_scopes());
        }

        debug!("Opening group: {}", descriptor);
        self.group = Some(Scope::open(ScopeKind::Group, descriptor));
        closed
    }

    /// Open an example inside the current group.
    ///
    /// A still-open example is force-closed first and returned.
    ///
    /// # Errors
    /// * `LifecycleError::NoActiveGroup` - no group is open
    pub fn open_example(
        &mut self,
        descriptor: &Descriptor,
    ) -> Result<Option<ClosedScope>, LifecycleError> {
        if self.group.is_none() {
            return Err(LifecycleError::NoActiveGroup {
                example: descriptor.name.clone(),
            });
        }

        let stale = if self.example.is_some() {
            Some(self.close_example()?)
        } else {
            None
        };

        debug!("Opening example: {}", descriptor);
        self.example = Some(Scope::open(ScopeKind::Example, descriptor));
        Ok(stale)
    }

    /// Attribute one event to the open scopes.
    ///
    /// Returns false when no group is open and the event was dropped.
    pub fn on_event(&mut self, elapsed: Duration) -> bool {
        let Some(group) = self.group.as_mut() else {
            self.dropped += 1;
            return false;
        };

        group.record(elapsed);
        if let Some(example) = self.example.as_mut() {
            example.record(elapsed);
        }

        self.event_count += 1;
        self.event_time = self.event_time.saturating_add(elapsed);
        true
    }

    /// Close the open example and fold it into the example aggregates
    ///
    /// # Errors
    /// * `LifecycleError::NoActiveExample` - no example is open
    pub fn close_example(&mut self) -> Result<ClosedScope, LifecycleError> {
        let example = self.example.take().ok_or(LifecycleError::NoActiveExample)?;
        let closed = example.close();

        if let Some(group) = self.group.as_mut() {
            group.examples += 1;
        }

        debug!(
            "Closed example {} ({} events)",
            closed.name, closed.event_count
        );
        self.examples.record(&closed);
        Ok(closed)
    }

    /// Close the open group, after any example still open inside it.
    ///
    /// Returns every scope closed, example first; empty when no group was open.
    pub fn close_group(&mut self) -> Vec<ClosedScope> {
        self.close_open_scopes()
    }

    fn close_open_scopes(&mut self) -> Vec<ClosedScope> {
        let mut closed = Vec::new();

        if let Ok(example) = self.close_example() {
            closed.push(example);
        }

        if let Some(group) = self.group.take() {
            let group = group.close();
            debug!("Closed group {} ({} events)", group.name, group.event_count);
            self.groups.record(&group);
            closed.push(group);
        }

        closed
    }

    pub fn groups(&self) -> &Aggregates {
        &self.groups
    }

    pub fn examples(&self) -> &Aggregates {
        &self.examples
    }

    /// Total events attributed to any group
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Total time of events attributed to any group
    pub fn event_time(&self) -> Duration {
        self.event_time
    }

    /// Events fired outside every scope
    pub fn dropped_events(&self) -> u64 {
        self.dropped
    }
}
