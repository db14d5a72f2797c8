//! Dataset walker: every entry under the source root, in path order.

use anyhow::{Result, bail};
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::tools::nested_relative;

/// One result from a directory walk: either a path to process or an error with optional path.
pub enum WalkOutcome {
    Ok(PathBuf),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => WalkOutcome::Ok(entry.into_path()),
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Entries found under the source root plus the ones that could not be read.
#[derive(Debug, Default)]
pub struct WalkResult {
    /// Sorted by path; a directory always precedes its contents.
    pub entries: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, String)>,
}

/// Walk `source` (root itself excluded). When `exclude` (the target root) lies inside
/// `source`, that subtree is not entered, so a run never consumes its own output.
pub fn walk_source(source: &Path, exclude: Option<&Path>) -> Result<WalkResult> {
    if !source.is_dir() {
        bail!("source directory {} does not exist", source.display());
    }
    let excluded = exclude.and_then(|t| nested_relative(t, source));
    let iter = WalkDir::new(source)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| match &excluded {
            Some(rel) => e.path().strip_prefix(source).map_or(true, |p| p != rel),
            None => true,
        })
        .map(to_outcome_walkdir);
    Ok(collect_walk(iter))
}

/// Consume walk outcomes: keep paths, record errors (walk continues past them), sort.
pub fn collect_walk<I>(iter: I) -> WalkResult
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut result = WalkResult::default();
    let mut last_path: Option<PathBuf> = None;
    for outcome in iter {
        match outcome {
            WalkOutcome::Ok(path) => {
                last_path = Some(path.clone());
                result.entries.push(path);
            }
            WalkOutcome::Err { msg, path } => {
                warn!("Permission denied or error accessing path: {}", msg);
                let path = path.unwrap_or_else(|| {
                    PathBuf::from(format!(
                        "<no-path, last was {}>",
                        last_path
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "<none>".to_string())
                    ))
                });
                result.skipped.push((path, msg));
            }
        }
    }
    result.entries.sort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn entries_are_sorted_and_exclude_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/c")).unwrap();
        fs::write(dir.path().join("b/c/z.off"), b"").unwrap();
        fs::write(dir.path().join("a.obj"), b"").unwrap();
        fs::write(dir.path().join("b/y.stl"), b"").unwrap();

        let walked = walk_source(dir.path(), None).unwrap();
        let rel: Vec<_> = walked
            .entries
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            ["a.obj", "b", "b/c", "b/c/z.off", "b/y.stl"].map(PathBuf::from)
        );
    }

    #[test]
    fn nested_target_is_not_walked() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("out/sub")).unwrap();
        fs::write(dir.path().join("out/fixconfig.json"), b"{}").unwrap();
        fs::write(dir.path().join("m.obj"), b"").unwrap();

        let walked = walk_source(dir.path(), Some(&dir.path().join("out"))).unwrap();
        assert_eq!(walked.entries, vec![dir.path().join("m.obj")]);
    }

    #[test]
    fn missing_source_is_an_error() {
        assert!(walk_source(Path::new("/nonexistent/meshfix-src"), None).is_err());
    }

    #[test]
    fn walk_errors_are_recorded_not_fatal() {
        let outcomes = vec![
            WalkOutcome::Ok(PathBuf::from("s/a")),
            WalkOutcome::Err {
                msg: "denied".to_string(),
                path: None,
            },
        ];
        let result = collect_walk(outcomes.into_iter());
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.skipped[0].1, "denied");
        assert!(result.skipped[0].0.to_string_lossy().contains("s/a"));
    }
}
