//! Load `meshfix.toml` (CLI only). Library callers build [`Opts`] directly.
//!
//! ```toml
//! [settings]
//! source = "data-raw"
//! target = "data-fixed"
//! resolution = 20000
//! simplify = true
//! workers = 4
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::ToolFailurePolicy;

#[derive(Debug, Default, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    source: Option<PathBuf>,
    target: Option<PathBuf>,
    scratch_dir: Option<PathBuf>,
    target_format: Option<String>,
    resolution: Option<u32>,
    simplify: Option<bool>,
    manifold_check: Option<bool>,
    face_num: Option<u64>,
    max_cost: Option<f64>,
    max_ratio: Option<f64>,
    manifold_exec: Option<String>,
    simplify_exec: Option<String>,
    workers: Option<usize>,
    parallel: Option<bool>,
    chunk_size: Option<usize>,
    on_tool_failure: Option<ToolFailurePolicy>,
    verbose: Option<bool>,
}

impl SettingsFile {
    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Read a settings file that must exist and parse; any problem is an error.
pub fn read_settings_file(path: &Path) -> Result<SettingsFile> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    SettingsFile::parse(&s).with_context(|| format!("invalid settings file {}", path.display()))
}

/// Load the default settings file at `path`. Missing file → `None`; unreadable or invalid → warning and `None`.
pub fn load_settings_file(path: &Path) -> Option<SettingsFile> {
    let s = std::fs::read_to_string(path).ok()?;
    SettingsFile::parse(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $section.$field.clone() {
                $opts.$field = v;
            }
        )+
    };
}

/// Apply file values on top of defaults. Call before environment and CLI overrides.
pub fn apply_file_to_opts(file: &SettingsFile, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(
        s,
        opts,
        source,
        target,
        scratch_dir,
        target_format,
        resolution,
        simplify,
        manifold_check,
        face_num,
        max_cost,
        max_ratio,
        manifold_exec,
        simplify_exec,
        workers,
        parallel,
        chunk_size,
        on_tool_failure,
        verbose,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_present_fields_are_applied() {
        let file = SettingsFile::parse(
            "[settings]\nresolution = 20000\nsimplify = true\non_tool_failure = \"copy\"\n",
        )
        .unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.resolution, 20_000);
        assert!(opts.simplify);
        assert_eq!(opts.on_tool_failure, ToolFailurePolicy::Copy);
        assert_eq!(opts.face_num, Opts::default().face_num);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(SettingsFile::parse("[settings]\nresolutoin = 1\n").is_err());
    }

    #[test]
    fn empty_file_is_valid() {
        let file = SettingsFile::parse("").unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.workers, Opts::default().workers);
    }
}
