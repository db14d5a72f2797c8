//! Running the external manifold/simplify executables.

use log::{debug, error};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{FixError, FixResult};

/// Run `exe args...` synchronously with stdout discarded and stderr inherited.
///
/// Launch failure, a non-zero exit, or a zero exit that left nothing at `target` are all
/// [`FixError::ExternalTool`]; each is logged with source and target before returning.
/// There is no timeout: a hung tool hangs the calling worker.
pub fn run_tool(
    tool: &'static str,
    exe: &str,
    args: &[OsString],
    source: &Path,
    target: &Path,
) -> FixResult<()> {
    debug!(
        "{} {}",
        exe,
        args.iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let reason = match Command::new(exe)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .status()
    {
        Err(e) => Some(format!("could not launch `{exe}`: {e}")),
        Ok(status) if !status.success() => Some(format!("`{exe}` exited with {status}")),
        Ok(_) if !target.is_file() => Some(format!("`{exe}` wrote no output")),
        Ok(_) => None,
    };

    match reason {
        None => Ok(()),
        Some(reason) => {
            error!(
                "Error {}: {} -> {} ({})",
                tool,
                source.display(),
                target.display(),
                reason
            );
            Err(FixError::ExternalTool {
                tool,
                source_path: source.to_path_buf(),
                target_path: target.to_path_buf(),
                reason,
            })
        }
    }
}
