//! Public types: run options, per-entry outcomes, and the batch report.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::FixError;
use crate::utils::config::{DISPATCH_CHUNK_SIZE, StageDefaults};

/// What to do when the manifold or simplify executable fails on an entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ToolFailurePolicy {
    /// Remove any partial output and report the entry as failed.
    #[default]
    Abort,
    /// Substitute a verbatim copy of the source, as for unreadable files.
    Copy,
}

/// Fully resolved options for one run. Built once at startup (CLI, env, file, defaults)
/// and passed by reference; also serialized as the `fixconfig.json` audit record.
#[derive(Clone, Debug, Serialize)]
pub struct Opts {
    /// Source tree (never modified).
    pub source: PathBuf,
    /// Mirror tree to write.
    pub target: PathBuf,
    /// Directory for intermediate and repaired files.
    pub scratch_dir: PathBuf,
    /// Suffix of the terminal output, e.g. `.obj`.
    pub target_format: String,
    /// Octree leaf count for the manifold tool.
    pub resolution: u32,
    /// Append the simplify stage.
    pub simplify: bool,
    pub manifold_check: bool,
    pub face_num: u64,
    pub max_cost: f64,
    pub max_ratio: f64,
    pub manifold_exec: String,
    pub simplify_exec: String,
    pub workers: usize,
    pub parallel: bool,
    /// Entries handed to a worker at a time.
    pub chunk_size: usize,
    pub on_tool_failure: ToolFailurePolicy,
    /// Debug logs and progress bar.
    #[serde(skip)]
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Opts {
            source: PathBuf::from(StageDefaults::SOURCE),
            target: PathBuf::from(StageDefaults::TARGET),
            scratch_dir: std::env::temp_dir(),
            target_format: StageDefaults::TARGET_FORMAT.to_string(),
            resolution: StageDefaults::RESOLUTION,
            simplify: false,
            manifold_check: true,
            face_num: StageDefaults::FACE_NUM,
            max_cost: StageDefaults::MAX_COST,
            max_ratio: StageDefaults::MAX_RATIO,
            manifold_exec: StageDefaults::MANIFOLD_EXEC.to_string(),
            simplify_exec: StageDefaults::SIMPLIFY_EXEC.to_string(),
            workers: StageDefaults::WORKERS,
            parallel: true,
            chunk_size: DISPATCH_CHUNK_SIZE,
            on_tool_failure: ToolFailurePolicy::Abort,
            verbose: false,
        }
    }
}

/// Terminal state of one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Regular file transformed; path of the final artifact.
    Converted(PathBuf),
    /// Regular file copied verbatim; path of the copy.
    FallbackCopied(PathBuf),
    /// Directory mirrored.
    MirroredDir(PathBuf),
    /// Neither file nor directory (socket, broken symlink, ...).
    Skipped,
}

/// Counts per outcome plus every entry that failed. Order of `failures` is completion order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub converted: usize,
    pub fallback_copied: usize,
    pub mirrored_dirs: usize,
    pub skipped: usize,
    pub failures: Vec<(PathBuf, FixError)>,
}

impl RunReport {
    pub fn record(&mut self, entry: PathBuf, result: Result<RunOutcome, FixError>) {
        match result {
            Ok(RunOutcome::Converted(_)) => self.converted += 1,
            Ok(RunOutcome::FallbackCopied(_)) => self.fallback_copied += 1,
            Ok(RunOutcome::MirroredDir(_)) => self.mirrored_dirs += 1,
            Ok(RunOutcome::Skipped) => self.skipped += 1,
            Err(e) => self.failures.push((entry, e)),
        }
    }

    pub fn processed(&self) -> usize {
        self.converted + self.fallback_copied + self.mirrored_dirs + self.skipped + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
