//! Configuration constants shared by the profiler, the adapter and the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of entries kept in each ranking unless configured otherwise
pub const DEFAULT_TOP_COUNT: usize = 5;

/// Upper bound accepted for `top_count`
pub const MAX_TOP_COUNT: usize = 1000;

// Environment variables consulted by `ProfilerConfig::from_env`
pub const ENV_EVENT: &str = "EVENT_PROF";
pub const ENV_RANK: &str = "EVENT_PROF_RANK";
pub const ENV_TOP: &str = "EVENT_PROF_TOP";
pub const ENV_EXAMPLES: &str = "EVENT_PROF_EXAMPLES";
pub const ENV_MERGE: &str = "EVENT_PROF_MERGE";

// Option-hash keys accepted by `ProfilerConfig::from_options`
pub const OPT_EVENT: &str = "event";
pub const OPT_RANK_BY: &str = "rank_by";
pub const OPT_TOP_COUNT: &str = "top_count";
pub const OPT_PER_EXAMPLE: &str = "per_example";
pub const OPT_MERGE_POLICY: &str = "merge_policy";

/// Event identifiers every registry knows about out of the box
pub const DEFAULT_EVENTS: &[&str] = &[
    "sql.query",
    "sql.active_record",
    "factory.create",
    "object.alloc",
    "http.request",
    "cache.read",
    "cache.write",
];

/// Name given to the group opened on behalf of an example that arrived
/// without one
pub const SYNTHETIC_GROUP_NAME: &str = "(ungrouped)";
