//! Profiler configuration.
//!
//! A configuration can be built three ways:
//! - in code, via `ProfilerConfig::new` and the `with_*` builders
//! - from an options hash (`event`, `rank_by`, `top_count`, `per_example`,
//!   `merge_policy`)
//! - from the `EVENT_PROF*` environment variables
//!
//! Whatever the source, `validate` must pass against an `EventRegistry`
//! before a profiler is built.

use crate::utils::config::{
    DEFAULT_EVENTS, DEFAULT_TOP_COUNT, ENV_EVENT, ENV_EXAMPLES, ENV_MERGE, ENV_RANK, ENV_TOP,
    MAX_TOP_COUNT, OPT_EVENT, OPT_MERGE_POLICY, OPT_PER_EXAMPLE, OPT_RANK_BY, OPT_TOP_COUNT,
};
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Metric used to order the final report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBy {
    /// Number of events fired inside the scope
    #[default]
    Count,
    /// Total time spent inside the events fired in the scope
    Time,
}

impl FromStr for RankBy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the symbol spelling (`:count`) as well as the bare word
        match s.trim().trim_start_matches(':').to_ascii_lowercase().as_str() {
            "count" => Ok(RankBy::Count),
            "time" => Ok(RankBy::Time),
            _ => Err(ConfigError::InvalidRankBy(s.to_string())),
        }
    }
}

impl fmt::Display for RankBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankBy::Count => write!(f, "count"),
            RankBy::Time => write!(f, "time"),
        }
    }
}

/// How repeated runs of the same `(name, location)` combine their metrics.
///
/// Run counts always add up regardless of the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    #[default]
    Sum,
    Max,
}

impl FromStr for MergePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(MergePolicy::Sum),
            "max" => Ok(MergePolicy::Max),
            _ => Err(ConfigError::InvalidFlag {
                key: OPT_MERGE_POLICY.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Set of event identifiers a profiler may subscribe to
#[derive(Debug, Clone)]
pub struct EventRegistry {
    events: BTreeSet<String>,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self {
            events: DEFAULT_EVENTS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl EventRegistry {
    /// Registry with the built-in event identifiers
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that knows nothing; useful when the host defines its own events
    pub fn empty() -> Self {
        Self {
            events: BTreeSet::new(),
        }
    }

    /// Make a custom event identifier available
    pub fn register(&mut self, event: impl Into<String>) -> &mut Self {
        self.events.insert(event.into());
        self
    }

    pub fn is_supported(&self, event: &str) -> bool {
        self.events.contains(event)
    }

    /// Supported identifiers in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(String::as_str)
    }
}

/// Profiler settings
///
/// **Public** - consumed by `Profiler::for_event` and `ProfilerSet::build`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilerConfig {
    /// Instrumented events to track, one profiler per entry
    pub events: Vec<String>,

    /// Ranking criterion
    pub rank_by: RankBy,

    /// Number of entries kept per ranking
    pub top_count: usize,

    /// Track examples individually (groups are always tracked)
    pub per_example: bool,

    /// How repeated runs of one scope combine
    pub merge_policy: MergePolicy,
}

impl ProfilerConfig {
    /// Create a config for `event` with default settings.
    ///
    /// A comma-separated list tracks several events at once.
    pub fn new(event: &str) -> Self {
        Self {
            events: split_events(event),
            rank_by: RankBy::default(),
            top_count: DEFAULT_TOP_COUNT,
            per_example: false,
            merge_policy: MergePolicy::default(),
        }
    }

    pub fn with_rank_by(mut self, rank_by: RankBy) -> Self {
        self.rank_by = rank_by;
        self
    }

    pub fn with_top_count(mut self, top_count: usize) -> Self {
        self.top_count = top_count;
        self
    }

    pub fn with_per_example(mut self, per_example: bool) -> Self {
        self.per_example = per_example;
        self
    }

    pub fn with_merge_policy(mut self, merge_policy: MergePolicy) -> Self {
        self.merge_policy = merge_policy;
        self
    }

    /// Build a config from an options hash.
    ///
    /// Only `event` is required; unknown keys are ignored.
    ///
    /// # Errors
    /// * `ConfigError::MissingEvent` - no `event` key or an empty value
    /// * `ConfigError::InvalidRankBy` / `InvalidTopCount` / `InvalidFlag` -
    ///   a value could not be parsed
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(
            |key| options.get(key).cloned(),
            [OPT_EVENT, OPT_RANK_BY, OPT_TOP_COUNT, OPT_PER_EXAMPLE, OPT_MERGE_POLICY],
        )
    }

    /// Build a config from the `EVENT_PROF*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable variable lookup
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(lookup, [ENV_EVENT, ENV_RANK, ENV_TOP, ENV_EXAMPLES, ENV_MERGE])
    }

    /// Shared parser; `keys` are the event, rank, top, per-example and merge names
    fn from_lookup<F>(lookup: F, keys: [&str; 5]) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let [event_key, rank_key, top_key, examples_key, merge_key] = keys;

        let event = lookup(event_key)
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingEvent)?;

        let mut config = Self::new(&event);

        if let Some(rank) = lookup(rank_key) {
            config.rank_by = rank.parse()?;
        }

        if let Some(top) = lookup(top_key) {
            config.top_count = top
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTopCount(top.clone()))?;
        }

        if let Some(flag) = lookup(examples_key) {
            config.per_example = parse_flag(examples_key, &flag)?;
        }

        if let Some(policy) = lookup(merge_key) {
            config.merge_policy = policy.parse()?;
        }

        debug!("Loaded profiler config: {:?}", config);

        Ok(config)
    }

    /// Check the config against the events the host can actually emit
    ///
    /// # Errors
    /// * `ConfigError::MissingEvent` - no event listed
    /// * `ConfigError::UnsupportedEvent` - an event is not in `registry`
    /// * `ConfigError::InvalidTopCount` - zero or above `MAX_TOP_COUNT`
    pub fn validate(&self, registry: &EventRegistry) -> Result<(), ConfigError> {
        if self.events.is_empty() {
            return Err(ConfigError::MissingEvent);
        }

        if let Some(unknown) = self.events.iter().find(|e| !registry.is_supported(e)) {
            return Err(ConfigError::UnsupportedEvent(unknown.clone()));
        }

        if self.top_count == 0 || self.top_count > MAX_TOP_COUNT {
            return Err(ConfigError::InvalidTopCount(self.top_count.to_string()));
        }

        Ok(())
    }
}

fn split_events(event: &str) -> Vec<String> {
    event
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
