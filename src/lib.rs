//! meshfix: batch repair of a mesh dataset into watertight manifolds via external tools

pub mod engine;
pub mod error;
pub mod mesh;
pub mod pipeline;
pub mod stages;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{FixError, FixResult, MeshError};

use log::debug;

/// Result alias used by public meshfix API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: mirror `opts.source` into `opts.target`, converting and repairing every mesh.
///
/// - Configuration problems (missing executable, bad target format, missing source) return `Err`
///   before anything is written.
/// - Per-entry failures do not; they are collected in [`RunReport::failures`]. Use
///   [`check_for_failures`](crate::pipeline::check_for_failures) to turn them into an error.
///
/// ```ignore
/// let opts = meshfix::Opts { source: "raw".into(), target: "fixed".into(), ..Default::default() };
/// let report = meshfix::fix_dataset(&opts)?;
/// assert!(report.is_success());
/// ```
pub fn fix_dataset(opts: &Opts) -> Result<RunReport> {
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);
    pipeline::fix_dataset(opts)
}
