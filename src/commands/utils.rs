use crate::output::read_report;
use crate::profiler::EventRegistry;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Validate a report JSON file
pub fn validate_report_file(file_path: &Path, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Validating report: {}", file_path.display())?;

    let report = read_report(file_path)
        .with_context(|| format!("Invalid report {}", file_path.display()))?;

    writeln!(out, "✓ Valid report JSON")?;
    writeln!(out, "  Version: {}", report.version)?;
    writeln!(out, "  Generated: {}", report.generated_at)?;
    for result in &report.results {
        writeln!(
            out,
            "  {}: {} events, {} groups, {} examples ranked",
            result.event,
            result.totals.event_count,
            result.groups.len(),
            result.examples.as_ref().map_or(0, |e| e.len())
        )?;
    }

    Ok(())
}

/// List the event identifiers profilers can subscribe to
pub fn display_events(registry: &EventRegistry, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Supported events:")?;
    for event in registry.iter() {
        writeln!(out, "  {}", event)?;
    }
    Ok(())
}

/// Display version information
pub fn display_version(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Event Prof v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "Report Schema: v{}", SCHEMA_VERSION)?;
    Ok(())
}
