//! Format-convert: normalize any readable mesh into the canonical interchange format.

use log::debug;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::StageOutcome;
use crate::error::{FixError, FixResult, MeshError};
use crate::mesh::{self, MeshFormat, off};
use crate::utils::{ScratchFiles, scratch_path};

#[derive(Clone, Debug)]
pub struct FormatConvert {
    format: MeshFormat,
    scratch_dir: PathBuf,
}

impl FormatConvert {
    /// `target_format` is a suffix such as `.obj`; anything without the leading dot,
    /// or without a writer, is a configuration error.
    pub fn new(target_format: &str, scratch_dir: &Path) -> FixResult<Self> {
        if !target_format.starts_with('.') {
            return Err(FixError::config(format!(
                "target format `{target_format}` is not a suffix, it should start with a dot"
            )));
        }
        let format = MeshFormat::from_suffix(target_format).ok_or_else(|| {
            FixError::config(format!("no writer for target format `{target_format}`"))
        })?;
        Ok(Self {
            format,
            scratch_dir: scratch_dir.to_path_buf(),
        })
    }

    /// Read `source` (repairing a legacy OFF header first if needed) and write it at
    /// `target` with the suffix replaced by the target format.
    pub fn convert(
        &self,
        source: &Path,
        target: &Path,
        scratch: &mut ScratchFiles,
    ) -> FixResult<StageOutcome> {
        let input = self.repair_legacy_header(source, scratch)?;
        let mesh = match mesh::read(&input) {
            Ok(m) => m,
            Err(MeshError::Io { path, source }) => return Err(FixError::Io { path, source }),
            Err(e) => return Ok(StageOutcome::Unreadable(e.to_string())),
        };
        let out = with_format_suffix(target, self.format);
        mesh::write(&out, &mesh, self.format).map_err(|e| match e {
            MeshError::Io { path, source } => FixError::Io { path, source },
            other => FixError::config(other),
        })?;
        debug!("{} -> {}", source.display(), out.display());
        Ok(StageOutcome::Produced(out))
    }

    /// For `.off` inputs whose 4th byte is not a line break, write a repaired copy to scratch
    /// (registered in `scratch`) and return its path. Otherwise return `source` unchanged.
    pub fn repair_legacy_header(
        &self,
        source: &Path,
        scratch: &mut ScratchFiles,
    ) -> FixResult<PathBuf> {
        if !is_legacy_off(source) {
            return Ok(source.to_path_buf());
        }
        let bytes = fs::read(source).map_err(|e| FixError::io(source, e))?;
        let Some(fixed) = off::repair_header(&bytes) else {
            return Ok(source.to_path_buf());
        };
        let repaired = scratch_path(&self.scratch_dir, MeshFormat::Off.suffix());
        scratch.push(repaired.clone());
        fs::write(&repaired, fixed).map_err(|e| FixError::io(&repaired, e))?;
        debug!(
            "Repaired OFF header: {} -> {}",
            source.display(),
            repaired.display()
        );
        Ok(repaired)
    }
}

impl fmt::Display for FormatConvert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormatConvert(target_format={})", self.format.suffix())
    }
}

fn is_legacy_off(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("off"))
}

/// `target` with its last suffix replaced by the format's.
pub fn with_format_suffix(target: &Path, format: MeshFormat) -> PathBuf {
    target.with_extension(&format.suffix()[1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OFF: &str = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";

    fn stage(dir: &Path) -> FormatConvert {
        FormatConvert::new(".obj", dir).unwrap()
    }

    #[test]
    fn rejects_suffix_without_dot_and_unknown_format() {
        let dir = Path::new("/tmp");
        assert!(FormatConvert::new("obj", dir).is_err());
        assert!(FormatConvert::new("", dir).is_err());
        assert!(FormatConvert::new(".xyz", dir).is_err());
    }

    #[test]
    fn broken_off_header_is_repaired_into_scratch() {
        let work = tempfile::tempdir().unwrap();
        let scratch_dir = tempfile::tempdir().unwrap();
        let src = work.path().join("glued.off");
        let glued = TRIANGLE_OFF.replacen("OFF\n", "OFF", 1);
        fs::write(&src, &glued).unwrap();

        let mut scratch = ScratchFiles::new();
        let repaired = stage(scratch_dir.path())
            .repair_legacy_header(&src, &mut scratch)
            .unwrap();

        assert_ne!(repaired, src);
        assert_eq!(scratch.paths(), [repaired.clone()]);
        let bytes = fs::read(&repaired).unwrap();
        assert_eq!(bytes[3], b'\n');
        let mut expected = glued.into_bytes();
        expected.insert(3, b'\n');
        assert_eq!(bytes, expected);
    }

    #[test]
    fn well_formed_off_creates_no_temporary() {
        let work = tempfile::tempdir().unwrap();
        let src = work.path().join("ok.off");
        fs::write(&src, TRIANGLE_OFF).unwrap();
        let mut scratch = ScratchFiles::new();
        let input = stage(work.path())
            .repair_legacy_header(&src, &mut scratch)
            .unwrap();
        assert_eq!(input, src);
        assert!(scratch.paths().is_empty());
    }

    #[test]
    fn convert_writes_target_with_format_suffix() {
        let work = tempfile::tempdir().unwrap();
        let src = work.path().join("tri.off");
        fs::write(&src, TRIANGLE_OFF).unwrap();
        let mut scratch = ScratchFiles::new();
        let outcome = stage(work.path())
            .convert(&src, &work.path().join("out.off"), &mut scratch)
            .unwrap();
        let out = work.path().join("out.obj");
        assert_eq!(outcome, StageOutcome::Produced(out.clone()));
        assert_eq!(mesh::read(&out).unwrap(), mesh::read(&src).unwrap());
    }

    #[test]
    fn converting_canonical_obj_again_changes_nothing() {
        let work = tempfile::tempdir().unwrap();
        let src = work.path().join("tri.off");
        fs::write(&src, TRIANGLE_OFF).unwrap();
        let mut scratch = ScratchFiles::new();
        let first = work.path().join("first.obj");
        let second = work.path().join("second.obj");
        stage(work.path()).convert(&src, &first, &mut scratch).unwrap();
        stage(work.path()).convert(&first, &second, &mut scratch).unwrap();
        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn non_mesh_is_unreadable_not_error() {
        let work = tempfile::tempdir().unwrap();
        let src = work.path().join("empty.obj");
        fs::write(&src, b"").unwrap();
        let mut scratch = ScratchFiles::new();
        let outcome = stage(work.path())
            .convert(&src, &work.path().join("out.obj"), &mut scratch)
            .unwrap();
        assert!(matches!(outcome, StageOutcome::Unreadable(_)));
        assert!(!work.path().join("out.obj").exists());
    }
}
