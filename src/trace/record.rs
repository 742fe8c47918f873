//! Recorded session format: one JSON object per line.
//!
//! ```text
//! {"type":"group_started","name":"UserTest","location":"./test/user_test.rb"}
//! {"type":"example_started","name":"test_0001_creates","location":"./test/user_test.rb:4"}
//! {"type":"event","event":"sql.query","elapsed_ms":1.5}
//! {"type":"example_finished","name":"test_0001_creates","location":"./test/user_test.rb:4"}
//! {"type":"group_finished","name":"UserTest","location":"./test/user_test.rb"}
//! ```

use crate::profiler::Descriptor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One line of a recorded session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceRecord {
    GroupStarted(Descriptor),
    GroupFinished(Descriptor),
    ExampleStarted(Descriptor),
    ExampleFinished(Descriptor),
    Event {
        event: String,
        /// Event duration in milliseconds; zero when the source does not time events
        #[serde(default)]
        elapsed_ms: f64,
    },
}

impl TraceRecord {
    /// Event duration, clamped at zero
    pub fn elapsed(&self) -> Duration {
        match self {
            TraceRecord::Event { elapsed_ms, .. } => {
                Duration::try_from_secs_f64(elapsed_ms / 1000.0).unwrap_or_default()
            }
            _ => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_lifecycle_record() {
        let record: TraceRecord = serde_json::from_str(
            r#"{"type":"group_started","name":"UserTest","location":"./user_test.rb"}"#,
        )
        .unwrap();
        assert_eq!(
            record,
            TraceRecord::GroupStarted(Descriptor::new("UserTest", "./user_test.rb"))
        );
    }

    #[test]
    fn test_event_elapsed_defaults_to_zero() {
        let record: TraceRecord =
            serde_json::from_str(r#"{"type":"event","event":"sql.query"}"#).unwrap();
        assert_eq!(record.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_event_elapsed() {
        let record = TraceRecord::Event {
            event: "sql.query".to_string(),
            elapsed_ms: 500.0,
        };
        assert_eq!(record.elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn test_negative_elapsed_is_zero() {
        let record = TraceRecord::Event {
            event: "sql.query".to_string(),
            elapsed_ms: -4.0,
        };
        assert_eq!(record.elapsed(), Duration::ZERO);
    }
}
