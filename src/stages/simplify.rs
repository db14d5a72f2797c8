//! Simplify: run the external quadric-error simplifier on an already-manifold mesh.
//!
//! Each threshold is a termination condition enforced by the tool; this stage only passes them on.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use super::{StageOutcome, require_executable};
use crate::engine::env::SIMPLIFY_VAR;
use crate::engine::external::run_tool;
use crate::error::{FixError, FixResult};

#[derive(Clone, Debug)]
pub struct Simplify {
    /// Ask the tool to verify manifoldness and write nothing if the check fails.
    manifold_check: bool,
    /// Stop when the face count is at most this.
    face_num: u64,
    /// Stop when the quadric error of the next collapse reaches this.
    max_cost: f64,
    /// Stop when current/original face count drops to this.
    max_ratio: f64,
    executable: String,
}

impl Simplify {
    pub fn new(
        manifold_check: bool,
        face_num: u64,
        max_cost: f64,
        max_ratio: f64,
        executable: &str,
    ) -> FixResult<Self> {
        if !max_cost.is_finite() || max_cost < 0.0 {
            return Err(FixError::config(format!(
                "max_cost must be a non-negative number, got {max_cost}"
            )));
        }
        if !(0.0..=1.0).contains(&max_ratio) {
            return Err(FixError::config(format!(
                "max_ratio must be within [0, 1], got {max_ratio}"
            )));
        }
        Ok(Self {
            manifold_check,
            face_num,
            max_cost,
            max_ratio,
            executable: require_executable(SIMPLIFY_VAR, executable)?,
        })
    }

    /// `-i source -o target [-m] -f face_num -c max_cost -r max_ratio`.
    pub fn args(&self, source: &Path, target: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-i".into(),
            source.as_os_str().to_owned(),
            "-o".into(),
            target.as_os_str().to_owned(),
        ];
        if self.manifold_check {
            args.push("-m".into());
        }
        args.extend([
            "-f".into(),
            self.face_num.to_string().into(),
            "-c".into(),
            self.max_cost.to_string().into(),
            "-r".into(),
            self.max_ratio.to_string().into(),
        ]);
        args
    }

    pub fn simplify(&self, source: &Path, target: &Path) -> FixResult<StageOutcome> {
        run_tool(
            "simplify",
            &self.executable,
            &self.args(source, target),
            source,
            target,
        )?;
        Ok(StageOutcome::Produced(target.to_path_buf()))
    }
}

impl fmt::Display for Simplify {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Simplify(manifold_check={}, face_num={}, max_cost={}, max_ratio={})",
            self.manifold_check, self.face_num, self.max_cost, self.max_ratio
        )
    }
}
