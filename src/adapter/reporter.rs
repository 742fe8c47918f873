//! Reporter for runners that report tests one at a time.
//!
//! The runner tells us "test `example` of `group` is about to run" and
//! "the test finished". Group boundaries are inferred: a test from a new
//! group finishes the previous one. The last group is finished on `report`.

use super::locator::{relative_location, Locator};
use crate::output::format_result;
use crate::profiler::{
    Descriptor, EventRegistry, EventSink, Lifecycle, ProfileResult,
    ProfilerConfig, ProfilerSet,
};
use crate::utils::error::ConfigError;
use log::{debug, error, info};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Location used when the locator cannot place a test
const UNKNOWN_LOCATION: &str = "(unknown)";

/// Sequential reporter adapter
///
/// **Public** - construct one per test run and hand it to the host runner
pub struct SequentialReporter<W: Write, L: Locator> {
    io: W,
    locator: L,

    /// `None` once configuration failed; every call is then a no-op
    profilers: Option<ProfilerSet>,

    current_group: Option<Descriptor>,
    current_example: Option<Descriptor>,
    workdir: Option<PathBuf>,
}

impl<W: Write, L: Locator> SequentialReporter<W, L> {
    /// Build from an options hash (`event`, `rank_by`, `top_count`, `per_example`).
    ///
    /// A bad configuration is reported once and leaves the reporter disabled;
    /// the test run itself carries on unprofiled.
    pub fn new(io: W, options: &HashMap<String, String>, locator: L) -> Self {
        let config = ProfilerConfig::from_options(options);
        Self::with_config(io, config, &EventRegistry::new(), locator)
    }

    /// Build from an already parsed configuration
    pub fn with_config(
        io: W,
        config: Result<ProfilerConfig, ConfigError>,
        registry: &EventRegistry,
        locator: L,
    ) -> Self {
        let profilers = config.and_then(|config| ProfilerSet::build(&config, registry));

        let profilers = match profilers {
            Ok(set) => Some(set),
            Err(e) => {
                error!("EventProf disabled: {}", e);
                None
            }
        };

        Self {
            io,
            locator,
            profilers,
            current_group: None,
            current_example: None,
            workdir: std::env::current_dir().ok(),
        }
    }

    /// Base directory locations are shown relative to
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.profilers.is_some()
    }

    /// A test is about to run
    pub fn before_test(&mut self, group: &str, example: &str) {
        let Some(profilers) = self.profilers.as_mut() else {
            return;
        };

        let location = self.locator.locate(group, example);
        let (file, line) = match &location {
            Some((path, line)) => (
                relative_location(path, self.workdir.as_deref()),
                line.to_string(),
            ),
            None => (UNKNOWN_LOCATION.to_string(), "0".to_string()),
        };

        let group_changed = self
            .current_group
            .as_ref()
            .map_or(true, |current| current.name != group);

        if group_changed {
            if let Some(previous) = self.current_group.take() {
                profilers.group_finished(&previous);
            }
            let descriptor = Descriptor::new(group, file.clone());
            profilers.group_started(&descriptor);
            self.current_group = Some(descriptor);
        }

        // The profiler normalizes the name itself
        let descriptor = Descriptor::new(example, format!("{}:{}", file, line));
        debug!("Starting example {}", descriptor);
        profilers.example_started(&descriptor);
        self.current_example = Some(descriptor);
    }

    /// The current test finished
    pub fn after_test(&mut self) {
        let (Some(profilers), Some(example)) =
            (self.profilers.as_mut(), self.current_example.take())
        else {
            return;
        };
        profilers.example_finished(&example);
    }

    /// The instrumented `event` fired
    pub fn record_event(&mut self, event: &str, elapsed: Duration) {
        if let Some(profilers) = self.profilers.as_mut() {
            profilers.notify(event, elapsed);
        }
    }

    /// Results collected so far, one per tracked event
    pub fn results(&self) -> Vec<ProfileResult> {
        self.profilers
            .as_ref()
            .map(ProfilerSet::results)
            .unwrap_or_default()
    }

    /// Finish the last group and write every summary to the output stream
    pub fn report(&mut self) -> io::Result<()> {
        let Some(profilers) = self.profilers.as_mut() else {
            return Ok(());
        };

        if let Some(example) = self.current_example.take() {
            profilers.example_finished(&example);
        }
        if let Some(group) = self.current_group.take() {
            profilers.group_finished(&group);
        }

        for result in profilers.results() {
            info!("EventProf results for {}", result.event);
            writeln!(self.io)?;
            writeln!(self.io, "{}", format_result(&result))?;
        }

        self.io.flush()
    }

    /// Give back the output stream
    pub fn into_inner(self) -> W {
        self.io
    }
}

impl<W: Write, L: Locator> EventSink for SequentialReporter<W, L> {
    fn notify(&mut self, event: &str, elapsed: Duration) {
        self.record_event(event, elapsed);
    }
}
