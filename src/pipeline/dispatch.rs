//! Fan entries out over a fixed worker pool, or run them in walk order on the calling thread.
//!
//! Parallel: feeder thread → bounded chunk queue → N workers → result channel → caller.
//! Completions arrive in any order. A failing entry never stops the other workers; every
//! failure is collected into the [`RunReport`].

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use log::{debug, error};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::context::{DispatchTuning, PipelineContext};
use super::runner::process_entry;
use crate::engine::progress::{BatchedProgress, ProgressBar};
use crate::error::FixResult;
use crate::utils::config::{ProgressConsts, QUEUE_DEPTH_PER_WORKER};
use crate::{RunOutcome, RunReport};

type EntryResult = (PathBuf, FixResult<RunOutcome>);

/// Run every entry and collect the outcomes.
pub fn dispatch(
    entries: Vec<PathBuf>,
    ctx: Arc<PipelineContext>,
    tuning: &DispatchTuning,
    bar: Option<&ProgressBar>,
) -> Result<RunReport> {
    if tuning.parallel {
        debug!(
            "Processing {} entries on {} workers (chunks of {})",
            entries.len(),
            tuning.workers,
            tuning.chunk_size
        );
        dispatch_parallel(entries, ctx, tuning, bar)
    } else {
        debug!("Processing {} entries sequentially", entries.len());
        Ok(dispatch_sequential(entries, &ctx, bar))
    }
}

/// Walk order; the first failure stops the run.
fn dispatch_sequential(
    entries: Vec<PathBuf>,
    ctx: &PipelineContext,
    bar: Option<&ProgressBar>,
) -> RunReport {
    let mut report = RunReport::default();
    let mut progress = BatchedProgress::new(bar, ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE);
    for entry in entries {
        let result = process_entry(&entry, ctx);
        let failed = result.is_err();
        if let Err(e) = &result {
            error!("Stopping: {}: {}", entry.display(), e);
        }
        report.record(entry, result);
        progress.tick();
        if failed {
            break;
        }
    }
    report
}

fn dispatch_parallel(
    entries: Vec<PathBuf>,
    ctx: Arc<PipelineContext>,
    tuning: &DispatchTuning,
    bar: Option<&ProgressBar>,
) -> Result<RunReport> {
    let (chunk_tx, chunk_rx) = bounded::<Vec<PathBuf>>(tuning.workers * QUEUE_DEPTH_PER_WORKER);
    let (result_tx, result_rx) = unbounded::<EntryResult>();

    let feeder = spawn_feeder(entries, tuning.chunk_size, chunk_tx)?;
    let workers = spawn_workers(chunk_rx, &result_tx, &ctx, tuning.workers)?;
    // Dropping the last sender closes the result channel once all workers exit.
    drop(result_tx);

    let mut report = RunReport::default();
    let mut progress = BatchedProgress::new(bar, ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE);
    while let Ok((entry, result)) = result_rx.recv() {
        report.record(entry, result);
        progress.tick();
    }
    progress.flush();

    feeder
        .join()
        .map_err(|_| anyhow::anyhow!("feeder thread panicked"))?;
    for (i, h) in workers.into_iter().enumerate() {
        h.join().map_err(|_| anyhow::anyhow!("worker-{} panicked", i))?;
    }
    Ok(report)
}

/// Send `entries` in chunks of `chunk_size`; dropping `chunk_tx` at the end lets workers exit.
fn spawn_feeder(
    entries: Vec<PathBuf>,
    chunk_size: usize,
    chunk_tx: Sender<Vec<PathBuf>>,
) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("feeder".to_string())
        .spawn(move || {
            let mut entries = entries.into_iter().peekable();
            while entries.peek().is_some() {
                let chunk: Vec<PathBuf> = entries.by_ref().take(chunk_size).collect();
                if chunk_tx.send(chunk).is_err() {
                    break;
                }
            }
        })
        .context("spawn feeder thread")
}

fn worker_loop(
    chunk_rx: Receiver<Vec<PathBuf>>,
    result_tx: Sender<EntryResult>,
    ctx: Arc<PipelineContext>,
) {
    while let Ok(chunk) = chunk_rx.recv() {
        for entry in chunk {
            let result = process_entry(&entry, &ctx);
            if result_tx.send((entry, result)).is_err() {
                return;
            }
        }
    }
}

fn spawn_workers(
    chunk_rx: Receiver<Vec<PathBuf>>,
    result_tx: &Sender<EntryResult>,
    ctx: &Arc<PipelineContext>,
    num_workers: usize,
) -> Result<Vec<JoinHandle<()>>> {
    (0..num_workers)
        .map(|i| {
            let chunk_rx = chunk_rx.clone();
            let result_tx = result_tx.clone();
            let ctx = Arc::clone(ctx);
            thread::Builder::new()
                .name(format!("worker-{i}"))
                .spawn(move || worker_loop(chunk_rx, result_tx, ctx))
                .with_context(|| format!("spawn worker-{i}"))
        })
        .collect()
}
