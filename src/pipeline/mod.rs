//! Pipeline components: context, walk, per-entry runner, dispatch, error reporting.

pub mod context;
pub mod dispatch;
pub mod error_handler;
pub mod orchestrator;
pub mod runner;
pub mod walk;

pub use context::{DispatchTuning, PipelineContext};
pub use dispatch::dispatch;
pub use error_handler::{check_for_failures, log_skipped_paths};
pub use orchestrator::fix_dataset;
pub use runner::process_entry;
pub use walk::{WalkOutcome, WalkResult, collect_walk, to_outcome_walkdir, walk_source};
