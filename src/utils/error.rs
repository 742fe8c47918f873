//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised while building a profiler from its configuration.
///
/// These are fatal: a misconfigured profiler is never built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No event specified (set `event` or EVENT_PROF)")]
    MissingEvent,

    #[error("Unsupported event: {0}")]
    UnsupportedEvent(String),

    #[error("Invalid rank criterion: {0} (expected `count` or `time`)")]
    InvalidRankBy(String),

    #[error("Invalid top count: {0}")]
    InvalidTopCount(String),

    #[error("Invalid value for `{key}`: {value}")]
    InvalidFlag { key: String, value: String },
}

/// Lifecycle calls that arrived out of order.
///
/// The tracker reports these; the profiler logs them and heals its state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Example `{example}` started with no active group")]
    NoActiveGroup { example: String },

    #[error("Example finished with no active example")]
    NoActiveExample,

    #[error("Example `{found}` finished while `{expected}` was active")]
    ExampleMismatch { expected: String, found: String },

    #[error("Group `{found}` finished while `{expected}` was active")]
    GroupMismatch { expected: String, found: String },

    #[error("Group `{group}` finished but was never started")]
    GroupNotStarted { group: String },
}

/// Errors that can occur while reading a recorded session trace
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid trace record at line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
