use anyhow::Result;
use log::{error, warn};
use std::path::PathBuf;

use crate::RunReport;

/// Log paths the walk could not read. Verbose mode lists each one.
pub fn log_skipped_paths(skipped: &[(PathBuf, String)], verbose: bool) {
    if skipped.is_empty() {
        return;
    }
    warn!(
        "Skipped {} paths due to permission errors or access issues",
        skipped.len()
    );
    if verbose {
        for (p, msg) in skipped {
            eprintln!("  skipped: {} ({})", p.display(), msg);
        }
    }
}

/// Surface entry failures after the batch: log each one, then fail if there were any.
/// Call after the dispatcher has joined its workers.
pub fn check_for_failures(report: &RunReport) -> Result<()> {
    if report.is_success() {
        return Ok(());
    }
    for (entry, e) in &report.failures {
        error!("{}: {}", entry.display(), e);
    }
    Err(anyhow::anyhow!(
        "{} of {} entries failed",
        report.failures.len(),
        report.processed()
    ))
}
