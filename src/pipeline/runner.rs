//! Per-entry runner: mirror directories, thread files through the stage list, fall back to a
//! verbatim copy when a stage reports the input unreadable.

use log::{debug, error, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::context::PipelineContext;
use crate::engine::tools::{ensure_dir, ensure_parent, mirror_path, remove_if_exists};
use crate::error::{FixError, FixResult};
use crate::stages::StageOutcome;
use crate::utils::{ScratchFiles, scratch_path};
use crate::{RunOutcome, ToolFailurePolicy};

/// Process one walked entry. Directories are mirrored, regular files transformed (or copied),
/// anything else skipped. Temporaries are removed before this returns, whatever the outcome.
pub fn process_entry(entry: &Path, ctx: &PipelineContext) -> FixResult<RunOutcome> {
    let target = mirror_path(entry, &ctx.source_root, &ctx.target_root).ok_or_else(|| {
        FixError::config(format!(
            "{} is not under source root {}",
            entry.display(),
            ctx.source_root.display()
        ))
    })?;

    // Follows symlinks: a link to a file is processed as that file, a dangling link is skipped.
    let meta = match fs::metadata(entry) {
        Ok(m) => m,
        Err(e) => {
            debug!("Skipping {}: {}", entry.display(), e);
            return Ok(RunOutcome::Skipped);
        }
    };
    if meta.is_dir() {
        ensure_dir(&target)?;
        return Ok(RunOutcome::MirroredDir(target));
    }
    if !meta.is_file() {
        debug!("Skipping non-regular entry {}", entry.display());
        return Ok(RunOutcome::Skipped);
    }

    ensure_parent(&target)?;
    run_stages(entry, &target, ctx)
}

/// Thread `entry` through every stage. All but the last stage write to fresh scratch paths;
/// the last writes to `target` with the canonical suffix.
fn run_stages(entry: &Path, target: &Path, ctx: &PipelineContext) -> FixResult<RunOutcome> {
    let mut scratch = ScratchFiles::new();
    let final_path = ctx.canonical_path(target);
    let last = ctx.stages.len() - 1;
    let mut input = entry.to_path_buf();

    for (i, stage) in ctx.stages.iter().enumerate() {
        let out = if i == last {
            final_path.clone()
        } else {
            let p = scratch_path(&ctx.scratch_dir, &ctx.canonical_suffix);
            scratch.push(p.clone());
            p
        };

        match stage.apply(&input, &out, &mut scratch) {
            Ok(StageOutcome::Produced(path)) => {
                if i != last && path != out {
                    scratch.push(path.clone());
                }
                input = path;
            }
            // A stage that reports the input unreadable has written nothing.
            Ok(StageOutcome::Unreadable(reason)) => {
                debug!("{} stage could not read {}: {}", stage.name(), input.display(), reason);
                return fallback_copy(entry, target);
            }
            Err(e) if e.is_tool_failure() && ctx.on_tool_failure == ToolFailurePolicy::Copy => {
                error!("{}; substituting a verbatim copy", e);
                if i == last {
                    remove_if_exists(&final_path)?;
                }
                return fallback_copy(entry, target);
            }
            Err(e) => {
                // Only the last stage writes at the target; a sibling may own that path otherwise.
                if i == last
                    && let Err(cleanup) = remove_if_exists(&final_path)
                {
                    warn!("{}", cleanup);
                }
                return Err(e);
            }
        }
    }

    // A verbatim copy left by an earlier run under the original name would be a second
    // file for the same shape.
    if target != final_path {
        remove_if_exists(target)?;
    }
    debug!("{} -> {}", entry.display(), input.display());
    Ok(RunOutcome::Converted(input))
}

/// Copy the original entry byte-for-byte to `target`.
fn fallback_copy(entry: &Path, target: &Path) -> FixResult<RunOutcome> {
    warn!("Direct copy: {} -> {}", entry.display(), target.display());
    fs::copy(entry, target).map_err(|e| FixError::io(target, e))?;
    Ok(RunOutcome::FallbackCopied(PathBuf::from(target)))
}
