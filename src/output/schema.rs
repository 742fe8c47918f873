//! Report JSON schema.
//!
//! Schema is versioned to allow future evolution.

use crate::profiler::ProfileResult;
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level report written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// One result per tracked event
    pub results: Vec<ProfileResult>,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,
}

impl Report {
    /// Wrap `results` with the current schema version and timestamp
    pub fn new(results: Vec<ProfileResult>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            results,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
