//! Replay command implementation.
//!
//! The replay command:
//! 1. Reads a recorded session trace
//! 2. Builds profilers from the CLI options and environment
//! 3. Replays the session through them
//! 4. Prints the summary and optionally writes a JSON report

use crate::output::{format_result, write_report, Report};
use crate::profiler::{
    EventRegistry, MergePolicy, ProfileResult, ProfilerConfig, ProfilerSet, RankBy,
};
use crate::trace::{read_trace, replay};
use crate::utils::config::{ENV_EVENT, MAX_TOP_COUNT};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the replay command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReplayArgs {
    /// Recorded session (JSON Lines)
    pub trace_path: PathBuf,

    /// Comma-separated events; falls back to `EVENT_PROF`
    pub events: Option<String>,

    /// Falls back to `EVENT_PROF_RANK`, then `count`
    pub rank_by: Option<RankBy>,

    /// Falls back to `EVENT_PROF_TOP`, then the default
    pub top_count: Option<usize>,

    /// Track examples individually (also enabled by `EVENT_PROF_EXAMPLES`)
    pub per_example: bool,

    /// Falls back to `EVENT_PROF_MERGE`, then `sum`
    pub merge_policy: Option<MergePolicy>,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print text summary to the output stream
    pub print_summary: bool,
}

impl Default for ReplayArgs {
    fn default() -> Self {
        Self {
            trace_path: PathBuf::from("session.jsonl"),
            events: None,
            rank_by: None,
            top_count: None,
            per_example: false,
            merge_policy: None,
            output_json: None,
            print_summary: true,
        }
    }
}

/// Execute the replay command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace read or parse failures
/// * Configuration errors (missing or unsupported event, bad values)
/// * Output write failures
pub fn execute_replay(args: &ReplayArgs, out: &mut dyn Write) -> Result<Vec<ProfileResult>> {
    let start_time = Instant::now();

    info!("Step 1/4: Reading trace {}...", args.trace_path.display());
    let records = read_trace(&args.trace_path)
        .with_context(|| format!("Failed to read trace {}", args.trace_path.display()))?;

    info!("Step 2/4: Building profilers...");
    let config = resolve_config(args, |key| std::env::var(key).ok())?;
    let mut profilers = ProfilerSet::build(&config, &EventRegistry::new())
        .context("Invalid profiler configuration")?;

    info!("Step 3/4: Replaying {} records...", records.len());
    let stats = replay(&records, &mut profilers);
    debug!("Replay stats: {:?}", stats);

    info!("Step 4/4: Writing results...");
    let results = profilers.results();

    if args.print_summary {
        for result in &results {
            writeln!(out)?;
            writeln!(out, "{}", format_result(result))?;
        }
    }

    if let Some(path) = &args.output_json {
        write_report(&Report::new(results.clone()), path)
            .context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }

    info!(
        "Replay completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(results)
}

/// Merge CLI options over the `EVENT_PROF*` environment
///
/// **Public** - exposed so callers can inject their own environment lookup
pub fn resolve_config<F>(args: &ReplayArgs, lookup: F) -> Result<ProfilerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ProfilerConfig::from_env_with(|key| match (&args.events, key) {
        (Some(events), ENV_EVENT) => Some(events.clone()),
        _ => lookup(key),
    })
    .context("Invalid profiler configuration")?;

    if let Some(rank_by) = args.rank_by {
        config.rank_by = rank_by;
    }
    if let Some(top_count) = args.top_count {
        config.top_count = top_count;
    }
    if args.per_example {
        config.per_example = true;
    }
    if let Some(merge_policy) = args.merge_policy {
        config.merge_policy = merge_policy;
    }

    Ok(config)
}

/// Validate replay arguments
///
/// **Public** - can be called before execute_replay for early validation
pub fn validate_args(args: &ReplayArgs) -> Result<()> {
    if args.trace_path.as_os_str().is_empty() {
        anyhow::bail!("Trace path cannot be empty");
    }

    if !args.trace_path.is_file() {
        anyhow::bail!("Trace file not found: {}", args.trace_path.display());
    }

    if let Some(events) = &args.events {
        if events.split(',').all(|e| e.trim().is_empty()) {
            anyhow::bail!("Event list cannot be empty");
        }
    }

    if let Some(top_count) = args.top_count {
        if top_count == 0 {
            anyhow::bail!("top count must be greater than 0");
        }
        if top_count > MAX_TOP_COUNT {
            anyhow::bail!("top count is too large (max {})", MAX_TOP_COUNT);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_config_cli_overrides_env() {
        let env = env(&[("EVENT_PROF", "factory.create"), ("EVENT_PROF_TOP", "9")]);
        let args = ReplayArgs {
            events: Some("sql.query".to_string()),
            top_count: Some(2),
            ..Default::default()
        };

        let config = resolve_config(&args, |k| env.get(k).cloned()).unwrap();
        assert_eq!(config.events, vec!["sql.query"]);
        assert_eq!(config.top_count, 2);
    }

    #[test]
    fn test_resolve_config_falls_back_to_env() {
        let env = env(&[
            ("EVENT_PROF", "factory.create"),
            ("EVENT_PROF_RANK", "time"),
            ("EVENT_PROF_EXAMPLES", "true"),
        ]);
        let config = resolve_config(&ReplayArgs::default(), |k| env.get(k).cloned()).unwrap();

        assert_eq!(config.events, vec!["factory.create"]);
        assert_eq!(config.rank_by, RankBy::Time);
        assert!(config.per_example);
        assert_eq!(config.merge_policy, MergePolicy::Sum);
    }

    #[test]
    fn test_resolve_config_merge_policy() {
        let env = env(&[("EVENT_PROF", "sql.query"), ("EVENT_PROF_MERGE", "max")]);
        let from_env = resolve_config(&ReplayArgs::default(), |k| env.get(k).cloned()).unwrap();
        assert_eq!(from_env.merge_policy, MergePolicy::Max);

        let args = ReplayArgs {
            merge_policy: Some(MergePolicy::Sum),
            ..Default::default()
        };
        let from_cli = resolve_config(&args, |k| env.get(k).cloned()).unwrap();
        assert_eq!(from_cli.merge_policy, MergePolicy::Sum);
    }

    #[test]
    fn test_resolve_config_without_event() {
        assert!(resolve_config(&ReplayArgs::default(), |_| None).is_err());
    }

    #[test]
    fn test_validate_args_missing_trace() {
        let args = ReplayArgs {
            trace_path: PathBuf::from("/definitely/not/here.jsonl"),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_count() {
        let trace = tempfile::NamedTempFile::new().unwrap();
        let mut args = ReplayArgs {
            trace_path: trace.path().to_path_buf(),
            top_count: Some(0),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());

        args.top_count = Some(MAX_TOP_COUNT + 1);
        assert!(validate_args(&args).is_err());

        args.top_count = Some(3);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_events() {
        let trace = tempfile::NamedTempFile::new().unwrap();
        let args = ReplayArgs {
            trace_path: trace.path().to_path_buf(),
            events: Some(" , ".to_string()),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }
}
