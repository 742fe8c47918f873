//! Event Prof
//!
//! Event-based test profiler: measures how often an instrumented event
//! (database queries, allocations, factory calls, ...) fires while each
//! test group and example runs, and ranks the worst offenders.
//!
//! ## Getting Started
//!
//! ```
//! use event_prof::profiler::{Descriptor, EventRegistry, Lifecycle, Profiler, ProfilerConfig};
//!
//! let config = ProfilerConfig::new("sql.query").with_per_example(true);
//! let mut profiler = Profiler::for_event("sql.query", &config, &EventRegistry::new()).unwrap();
//!
//! let group = Descriptor::new("UserTest", "./test/user_test.rb");
//! let example = Descriptor::new("test_0001_creates_user", "./test/user_test.rb:4");
//!
//! profiler.group_started(&group);
//! profiler.example_started(&example);
//! profiler.on_event();
//! profiler.example_finished(&example);
//! profiler.group_finished(&group);
//!
//! let result = profiler.result();
//! assert_eq!(result.groups.entries[0].event_count, 1);
//! assert_eq!(result.examples.unwrap().entries[0].name, "creates_user");
//! ```
//!
//! Recorded sessions can also be replayed from the command line:
//!
//! ```bash
//! event-prof replay --trace session.jsonl --event sql.query --per-example
//! ```

pub mod adapter;
pub mod commands;
pub mod output;
pub mod profiler;
pub mod trace;
pub mod utils;
