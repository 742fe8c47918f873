//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod replay;
pub mod utils;

// Re-export main command functions
pub use replay::{execute_replay, resolve_config, validate_args, ReplayArgs};
pub use utils::{display_events, display_version, validate_report_file};
