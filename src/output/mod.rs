//! Output of profile results.
//!
//! This module handles:
//! - Text summaries for the terminal
//! - Versioned JSON reports (write and read back)

pub mod json;
pub mod schema;
pub mod text;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use schema::Report;
pub use text::{format_duration, format_result};
