//! Scopes: the groups and examples events are attributed to.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Identity of a group or example as handed over by a reporter adapter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor {
    /// Display name, not globally unique
    pub name: String,

    /// `<path>:<line>` for examples, `<path>` for groups
    pub location: String,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Source file part of the location, without the line number
    pub fn file(&self) -> &str {
        match self.location.rsplit_once(':') {
            Some((file, line)) if line.chars().all(|c| c.is_ascii_digit()) => file,
            _ => &self.location,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

/// Whether a scope is a group or an example
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Group,
    Example,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Group => write!(f, "group"),
            ScopeKind::Example => write!(f, "example"),
        }
    }
}

/// Aggregation key: a scope is the same scope when both name and location match
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    pub name: String,
    pub location: String,
}

/// Strip the `test_` / `test_0042_` prefix hosts put in front of example names
///
/// ```
/// use event_prof::profiler::normalize_example_name;
///
/// assert_eq!(normalize_example_name("test_0042_computes_total"), "computes_total");
/// assert_eq!(normalize_example_name("test_computes_total"), "computes_total");
/// ```
pub fn normalize_example_name(name: &str) -> String {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let prefix = PREFIX.get_or_init(|| Regex::new(r"^test_(?:\d+_)?").expect("valid regex"));
    prefix.replace(name, "").into_owned()
}

/// An open group or example
#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub name: String,
    pub location: String,
    pub event_count: u64,
    pub event_time: Duration,
    /// Examples closed inside this scope (groups only)
    pub examples: u64,
    pub started_at: Instant,
}

impl Scope {
    /// Open a scope with zeroed counters; example names are normalized
    pub fn open(kind: ScopeKind, descriptor: &Descriptor) -> Self {
        let name = match kind {
            ScopeKind::Group => descriptor.name.clone(),
            ScopeKind::Example => normalize_example_name(&descriptor.name),
        };

        Self {
            kind,
            name,
            location: descriptor.location.clone(),
            event_count: 0,
            event_time: Duration::ZERO,
            examples: 0,
            started_at: Instant::now(),
        }
    }

    /// Attribute one event to this scope
    pub fn record(&mut self, elapsed: Duration) {
        self.event_count += 1;
        self.event_time = self.event_time.saturating_add(elapsed);
    }

    /// Whether `descriptor` refers to this scope
    pub fn matches(&self, descriptor: &Descriptor) -> bool {
        let name = match self.kind {
            ScopeKind::Group => descriptor.name.clone(),
            ScopeKind::Example => normalize_example_name(&descriptor.name),
        };
        self.name == name && self.location == descriptor.location
    }

    /// Stop the clock and freeze the counters
    pub fn close(self) -> ClosedScope {
        ClosedScope {
            kind: self.kind,
            run_time: self.started_at.elapsed(),
            name: self.name,
            location: self.location,
            event_count: self.event_count,
            event_time: self.event_time,
            examples: self.examples,
        }
    }
}

/// A finished scope, ready to be folded into the aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedScope {
    pub kind: ScopeKind,
    pub name: String,
    pub location: String,
    pub event_count: u64,
    pub event_time: Duration,
    pub run_time: Duration,
    pub examples: u64,
}

impl ClosedScope {
    pub fn key(&self) -> ScopeKey {
        ScopeKey {
            name: self.name.clone(),
            location: self.location.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_numbered_prefix() {
        assert_eq!(normalize_example_name("test_0042_computes_total"), "computes_total");
    }

    #[test]
    fn test_normalize_plain_prefix() {
        assert_eq!(normalize_example_name("test_computes_total"), "computes_total");
    }

    #[test]
    fn test_normalize_leaves_other_names() {
        assert_eq!(normalize_example_name("computes total"), "computes total");
        assert_eq!(normalize_example_name("my_test_case"), "my_test_case");
    }

    #[test]
    fn test_descriptor_file() {
        assert_eq!(Descriptor::new("a", "./test/user_test.rb:12").file(), "./test/user_test.rb");
        assert_eq!(Descriptor::new("a", "./test/user_test.rb").file(), "./test/user_test.rb");
    }

    #[test]
    fn test_scope_record_and_close() {
        let mut scope = Scope::open(ScopeKind::Example, &Descriptor::new("test_0001_works", "a.rb:3"));
        scope.record(Duration::from_millis(5));
        scope.record(Duration::from_millis(7));

        let closed = scope.close();
        assert_eq!(closed.name, "works");
        assert_eq!(closed.event_count, 2);
        assert_eq!(closed.event_time, Duration::from_millis(12));
    }

    #[test]
    fn test_example_matches_raw_name() {
        let scope = Scope::open(ScopeKind::Example, &Descriptor::new("test_0001_works", "a.rb:3"));
        assert!(scope.matches(&Descriptor::new("test_0001_works", "a.rb:3")));
        assert!(scope.matches(&Descriptor::new("works", "a.rb:3")));
        assert!(!scope.matches(&Descriptor::new("works", "a.rb:9")));
    }
}
