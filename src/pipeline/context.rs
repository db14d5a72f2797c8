//! Pipeline context and tuning: read-only state shared by every worker, and pool settings.

use std::path::{Path, PathBuf};

use crate::error::{FixError, FixResult};
use crate::stages::Stage;
use crate::utils::cap_workers;
use crate::{Opts, ToolFailurePolicy};

/// Everything a worker needs to process an entry. Built once per run, shared behind an `Arc`.
#[derive(Debug)]
pub struct PipelineContext {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    pub scratch_dir: PathBuf,
    /// Ordered, non-empty.
    pub stages: Vec<Stage>,
    /// Suffix of the terminal stage output and of intermediate scratch files, e.g. `.obj`.
    pub canonical_suffix: String,
    pub on_tool_failure: ToolFailurePolicy,
}

impl PipelineContext {
    pub fn new(opts: &Opts, stages: Vec<Stage>) -> FixResult<Self> {
        if stages.is_empty() {
            return Err(FixError::config("stage list is empty"));
        }
        Ok(Self {
            source_root: opts.source.clone(),
            target_root: opts.target.clone(),
            scratch_dir: opts.scratch_dir.clone(),
            stages,
            canonical_suffix: opts.target_format.clone(),
            on_tool_failure: opts.on_tool_failure,
        })
    }

    /// `path` with the canonical suffix.
    pub fn canonical_path(&self, path: &Path) -> PathBuf {
        path.with_extension(self.canonical_suffix.trim_start_matches('.'))
    }
}

/// Worker pool settings derived from opts, rayon and the FD limit.
#[derive(Clone, Debug)]
pub struct DispatchTuning {
    pub workers: usize,
    pub parallel: bool,
    pub chunk_size: usize,
}

impl DispatchTuning {
    /// `workers == 0` means rayon's available parallelism.
    pub fn from_opts(opts: &Opts) -> Self {
        let requested = if opts.workers == 0 {
            rayon::current_num_threads()
        } else {
            opts.workers
        };
        Self {
            workers: cap_workers(requested).max(1),
            parallel: opts.parallel,
            chunk_size: opts.chunk_size.max(1),
        }
    }
}
