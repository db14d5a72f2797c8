//! Manifold-fix: run the external repair tool to get a watertight manifold approximation.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use super::{StageOutcome, require_executable};
use crate::engine::env::MANIFOLD_VAR;
use crate::engine::external::run_tool;
use crate::error::FixResult;

#[derive(Clone, Debug)]
pub struct ManifoldFix {
    /// Octree leaf count; output face count grows roughly linearly with it.
    resolution: u32,
    executable: String,
}

impl ManifoldFix {
    pub fn new(resolution: u32, executable: &str) -> FixResult<Self> {
        Ok(Self {
            resolution,
            executable: require_executable(MANIFOLD_VAR, executable)?,
        })
    }

    /// Invocation arguments: `source target resolution`.
    pub fn args(&self, source: &Path, target: &Path) -> Vec<OsString> {
        vec![
            source.as_os_str().to_owned(),
            target.as_os_str().to_owned(),
            self.resolution.to_string().into(),
        ]
    }

    /// `exe source target resolution`. Tool failures are returned, never retried.
    pub fn fix(&self, source: &Path, target: &Path) -> FixResult<StageOutcome> {
        run_tool(
            "manifold",
            &self.executable,
            &self.args(source, target),
            source,
            target,
        )?;
        Ok(StageOutcome::Produced(target.to_path_buf()))
    }
}

impl fmt::Display for ManifoldFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ManifoldFix(resolution={})", self.resolution)
    }
}
