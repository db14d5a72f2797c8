//! Path utilities: mirroring source entries under the target root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FixError, FixResult};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// `target_root / (entry relative to source_root)`, or `None` if `entry` is not under `source_root`.
pub fn mirror_path(entry: &Path, source_root: &Path, target_root: &Path) -> Option<PathBuf> {
    path_relative_to(entry, source_root).map(|rel| target_root.join(rel))
}

/// Create the parent directory of `path`. Idempotent; concurrent calls for siblings are fine.
pub fn ensure_parent(path: &Path) -> FixResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Create `dir` and its ancestors. Idempotent; concurrent calls are fine.
pub fn ensure_dir(dir: &Path) -> FixResult<()> {
    fs::create_dir_all(dir).map_err(|e| FixError::io(dir, e))
}

/// Canonical form of `path`. For a path that does not exist yet, the nearest existing
/// ancestor is canonicalized and the rest appended.
pub fn canonical_or_self(path: &Path) -> PathBuf {
    if let Ok(p) = path.canonicalize() {
        return p;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            canonical_or_self(parent).join(name)
        }
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

/// When `inner` lies strictly inside `outer`, its path relative to `outer`.
/// Both are canonicalized first, so `./data/out` inside `data` is detected.
pub fn nested_relative(inner: &Path, outer: &Path) -> Option<PathBuf> {
    let inner = canonical_or_self(inner);
    let outer = canonical_or_self(outer);
    path_relative_to(&inner, &outer).filter(|rel| !rel.as_os_str().is_empty())
}

/// Remove a file if present; a missing file is not an error.
pub fn remove_if_exists(path: &Path) -> FixResult<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(FixError::io(path, e)),
        _ => Ok(()),
    }
}
