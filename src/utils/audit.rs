//! `fixconfig.json`: record of the resolved options, written to the target root before processing.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::PathBuf;

use crate::Opts;
use crate::utils::config::PackagePaths;

/// Pretty-printed JSON of `opts`, 4-space indent, keys sorted.
pub fn audit_json(opts: &Opts) -> Result<String> {
    // serde_json::Map is a BTreeMap (no preserve_order), so going through Value sorts keys.
    let value = serde_json::to_value(opts).context("serialize options")?;
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser).context("format options")?;
    String::from_utf8(buf).context("options JSON is not UTF-8")
}

/// Create the target root if needed and write the audit record there. Returns its path.
pub fn write_audit_record(opts: &Opts) -> Result<PathBuf> {
    fs::create_dir_all(&opts.target)
        .with_context(|| format!("create target directory {}", opts.target.display()))?;
    let path = opts.target.join(PackagePaths::get().audit_filename());
    fs::write(&path, audit_json(opts)?)
        .with_context(|| format!("write audit record {}", path.display()))?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}
