use anyhow::Result;
use log::{debug, info};
use std::sync::Arc;

use crate::engine::progress::setup_progress;
use crate::pipeline::{self, DispatchTuning, PipelineContext};
use crate::stages::build_stages;
use crate::utils::{prepare_scratch_dir, write_audit_record};
use crate::{Opts, RunReport};

/// Main orchestrator: build stages, record the invocation, walk the source, process every entry.
///
/// Configuration errors surface before anything is written. Entry failures do not make this
/// return `Err`; they are collected in [`RunReport::failures`] (see
/// [`check_for_failures`](crate::pipeline::check_for_failures)).
pub fn fix_dataset(opts: &Opts) -> Result<RunReport> {
    let stages = build_stages(opts)?;
    for stage in &stages {
        debug!("Stage: {}", stage);
    }
    let ctx = Arc::new(PipelineContext::new(opts, stages)?);

    let walked = pipeline::walk_source(&opts.source, Some(&opts.target))?;
    prepare_scratch_dir(&opts.scratch_dir)?;
    write_audit_record(opts)?;
    pipeline::log_skipped_paths(&walked.skipped, opts.verbose);

    let tuning = DispatchTuning::from_opts(opts);
    info!(
        "Fixing {} entries: {} -> {}",
        walked.entries.len(),
        opts.source.display(),
        opts.target.display()
    );
    let bar = setup_progress(opts.verbose, walked.entries.len());
    let report = pipeline::dispatch(walked.entries, ctx, &tuning, bar.as_ref())?;
    if bar.is_some() {
        eprintln!();
    }
    Ok(report)
}
