//! Transform stages: a closed set of variants sharing one `apply` capability.
//!
//! A stage maps `(input path, desired output path)` to the path it actually wrote, or reports
//! the input as not a mesh. Temporary files a stage creates are registered in the caller's
//! [`ScratchFiles`] as soon as they exist, so they are removed on every exit path.

pub mod convert;
pub mod manifold;
pub mod simplify;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::error::{FixError, FixResult};
use crate::utils::ScratchFiles;

pub use convert::FormatConvert;
pub use manifold::ManifoldFix;
pub use simplify::Simplify;

/// Result of applying one stage to one input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    /// Output written at this path (the suffix may differ from the requested one).
    Produced(PathBuf),
    /// Input is not a parseable mesh; the runner substitutes a verbatim copy.
    Unreadable(String),
}

#[derive(Clone, Debug)]
pub enum Stage {
    Convert(FormatConvert),
    Manifold(ManifoldFix),
    Simplify(Simplify),
}

impl Stage {
    pub fn apply(
        &self,
        source: &Path,
        target: &Path,
        scratch: &mut ScratchFiles,
    ) -> FixResult<StageOutcome> {
        match self {
            Stage::Convert(s) => s.convert(source, target, scratch),
            Stage::Manifold(s) => s.fix(source, target),
            Stage::Simplify(s) => s.simplify(source, target),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Convert(_) => "convert",
            Stage::Manifold(_) => "manifold",
            Stage::Simplify(_) => "simplify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Convert(s) => fmt::Display::fmt(s, f),
            Stage::Manifold(s) => fmt::Display::fmt(s, f),
            Stage::Simplify(s) => fmt::Display::fmt(s, f),
        }
    }
}

/// Stage list for a run: convert → manifold → (simplify when enabled).
/// Executable paths come from `opts`, already resolved; configuration errors surface here, before any entry runs.
pub fn build_stages(opts: &Opts) -> FixResult<Vec<Stage>> {
    let mut stages = vec![
        Stage::Convert(FormatConvert::new(&opts.target_format, &opts.scratch_dir)?),
        Stage::Manifold(ManifoldFix::new(opts.resolution, &opts.manifold_exec)?),
    ];
    if opts.simplify {
        stages.push(Stage::Simplify(Simplify::new(
            opts.manifold_check,
            opts.face_num,
            opts.max_cost,
            opts.max_ratio,
            &opts.simplify_exec,
        )?));
    }
    Ok(stages)
}

/// Shared check for executable names.
fn require_executable(name: &'static str, exe: &str) -> FixResult<String> {
    if exe.trim().is_empty() {
        return Err(FixError::ConfigurationMissing {
            name: name.to_string(),
        });
    }
    Ok(exe.to_string())
}
