//! End-to-end runs of `fix_dataset` with shell scripts standing in for the repair tools.
#![cfg(unix)]

use meshfix::pipeline::check_for_failures;
use meshfix::{Opts, ToolFailurePolicy, fix_dataset};
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

const TETRA: &str = "OFF\n4 4 0\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n3 0 2 1\n3 0 1 3\n3 0 3 2\n3 1 2 3\n";
const TETRA_FUSED_HEADER: &str =
    "OFF4 4 0\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n3 0 2 1\n3 0 1 3\n3 0 3 2\n3 1 2 3\n";

/// Copies `$1` to `$2`, like a manifold tool that changes nothing.
const FAKE_MANIFOLD: &str = "#!/bin/sh\ncp \"$1\" \"$2\"\n";
/// Copies the `-i` file to the `-o` file, ignoring the other flags.
const FAKE_SIMPLIFY: &str = "#!/bin/sh\n\
while [ $# -gt 0 ]; do\n\
  case \"$1\" in\n\
    -i) in=\"$2\"; shift 2 ;;\n\
    -o) out=\"$2\"; shift 2 ;;\n\
    *) shift ;;\n\
  esac\n\
done\n\
cp \"$in\" \"$out\"\n";
const FAILING_TOOL: &str = "#!/bin/sh\nexit 3\n";

struct Fixture {
    source: TempDir,
    target: TempDir,
    scratch: TempDir,
    tools: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fx = Fixture {
            source: tempfile::tempdir().unwrap(),
            target: tempfile::tempdir().unwrap(),
            scratch: tempfile::tempdir().unwrap(),
            tools: tempfile::tempdir().unwrap(),
        };
        fx.write_source("cube.off", TETRA.as_bytes());
        fx.write_source("chairs/a/chair.off", TETRA_FUSED_HEADER.as_bytes());
        fx.write_source("chairs/notes.txt", b"not a mesh\n");
        fs::create_dir_all(fx.source.path().join("empty/inner")).unwrap();
        fx
    }

    fn write_source(&self, rel: &str, bytes: &[u8]) {
        let p = self.source.path().join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, bytes).unwrap();
    }

    fn tool(&self, name: &str, script: &str) -> String {
        let p = self.tools.path().join(name);
        fs::write(&p, script).unwrap();
        fs::set_permissions(&p, fs::Permissions::from_mode(0o755)).unwrap();
        p.to_string_lossy().into_owned()
    }

    fn opts(&self) -> Opts {
        Opts {
            source: self.source.path().to_path_buf(),
            target: self.target.path().to_path_buf(),
            scratch_dir: self.scratch.path().to_path_buf(),
            manifold_exec: self.tool("manifold", FAKE_MANIFOLD),
            simplify_exec: self.tool("simplify", FAKE_SIMPLIFY),
            workers: 3,
            chunk_size: 2,
            ..Opts::default()
        }
    }
}

/// Relative path → contents (`None` for directories) of every entry under `root`.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            let content = e.file_type().is_file().then(|| fs::read(e.path()).unwrap());
            (rel, content)
        })
        .collect()
}

fn is_empty_dir(p: &Path) -> bool {
    fs::read_dir(p).unwrap().next().is_none()
}

#[test]
fn test_tree_is_mirrored_with_converted_meshes_and_copies() {
    let fx = Fixture::new();
    let before = snapshot(fx.source.path());

    let report = fix_dataset(&fx.opts()).unwrap();
    assert!(check_for_failures(&report).is_ok());
    assert_eq!(report.converted, 2);
    assert_eq!(report.fallback_copied, 1);
    assert_eq!(report.mirrored_dirs, 4);

    let dst = fx.target.path();
    assert!(dst.join("cube.obj").is_file());
    assert!(dst.join("chairs/a/chair.obj").is_file());
    assert!(!dst.join("cube.off").exists());
    assert!(dst.join("empty/inner").is_dir());
    assert_eq!(
        fs::read(dst.join("chairs/notes.txt")).unwrap(),
        b"not a mesh\n"
    );
    assert!(dst.join("fixconfig.json").is_file());

    assert_eq!(snapshot(fx.source.path()), before);
    assert!(is_empty_dir(fx.scratch.path()));
}

#[test]
fn test_sequential_and_parallel_runs_agree() {
    let fx = Fixture::new();
    let parallel = fx.opts();
    fix_dataset(&parallel).unwrap();
    let from_parallel = snapshot(fx.target.path());

    let other_target = tempfile::tempdir().unwrap();
    let sequential = Opts {
        target: other_target.path().to_path_buf(),
        parallel: false,
        ..fx.opts()
    };
    fix_dataset(&sequential).unwrap();
    let mut from_sequential = snapshot(other_target.path());

    // The audit record names its own target.
    let audit = PathBuf::from("fixconfig.json");
    from_sequential.insert(audit.clone(), from_parallel[&audit].clone());
    assert_eq!(from_parallel, from_sequential);
}

#[test]
fn test_converted_output_is_an_obj_of_the_same_shape() {
    let fx = Fixture::new();
    fix_dataset(&fx.opts()).unwrap();

    let mesh = meshfix::mesh::read(&fx.target.path().join("cube.obj")).unwrap();
    assert_eq!(mesh.points.len(), 4);
    assert_eq!(mesh.cells.len(), 4);
}

#[test]
fn test_simplify_stage_runs_after_manifold() {
    let fx = Fixture::new();
    let opts = Opts {
        simplify: true,
        ..fx.opts()
    };
    let report = fix_dataset(&opts).unwrap();
    assert!(report.is_success());
    assert!(fx.target.path().join("cube.obj").is_file());
    assert!(is_empty_dir(fx.scratch.path()));
}

#[test]
fn test_tool_failure_aborts_entry_by_default() {
    let fx = Fixture::new();
    let opts = Opts {
        manifold_exec: fx.tool("broken", FAILING_TOOL),
        ..fx.opts()
    };
    let report = fix_dataset(&opts).unwrap();

    assert_eq!(report.failures.len(), 2);
    assert!(check_for_failures(&report).is_err());
    assert!(!fx.target.path().join("cube.obj").exists());
    assert!(!fx.target.path().join("cube.off").exists());
    // Unreadable inputs never reach the tool.
    assert!(fx.target.path().join("chairs/notes.txt").is_file());
    assert!(is_empty_dir(fx.scratch.path()));
}

#[test]
fn test_tool_failure_can_fall_back_to_copy() {
    let fx = Fixture::new();
    let opts = Opts {
        manifold_exec: fx.tool("broken", FAILING_TOOL),
        on_tool_failure: ToolFailurePolicy::Copy,
        ..fx.opts()
    };
    let report = fix_dataset(&opts).unwrap();

    assert!(report.is_success());
    assert_eq!(report.fallback_copied, 3);
    assert_eq!(
        fs::read(fx.target.path().join("cube.off")).unwrap(),
        TETRA.as_bytes()
    );
    assert!(!fx.target.path().join("cube.obj").exists());
}

#[test]
fn test_rerun_replaces_stale_fallback_copy() {
    let fx = Fixture::new();
    let broken = Opts {
        manifold_exec: fx.tool("broken", FAILING_TOOL),
        on_tool_failure: ToolFailurePolicy::Copy,
        ..fx.opts()
    };
    fix_dataset(&broken).unwrap();
    assert!(fx.target.path().join("cube.off").is_file());

    fix_dataset(&fx.opts()).unwrap();
    assert!(fx.target.path().join("cube.obj").is_file());
    assert!(!fx.target.path().join("cube.off").exists());
}

#[test]
fn test_missing_source_fails_before_writing() {
    let fx = Fixture::new();
    let target = fx.target.path().join("never");
    let opts = Opts {
        source: fx.source.path().join("does-not-exist"),
        target: target.clone(),
        ..fx.opts()
    };
    assert!(fix_dataset(&opts).is_err());
    assert!(!target.exists());
}

#[test]
fn test_empty_executable_is_a_configuration_error() {
    let fx = Fixture::new();
    let opts = Opts {
        manifold_exec: String::new(),
        ..fx.opts()
    };
    let err = fix_dataset(&opts).unwrap_err();
    assert!(err.to_string().contains("manifold"));
    assert!(is_empty_dir(fx.target.path()));
}

#[test]
fn test_fallback_never_removes_a_sibling_conversion() {
    let fx = Fixture::new();
    fx.write_source(
        "pair/a.obj",
        b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
    );
    fx.write_source("pair/a.off", b"garbage bytes");

    for parallel in [false, true] {
        let target = tempfile::tempdir().unwrap();
        let opts = Opts {
            target: target.path().to_path_buf(),
            parallel,
            ..fx.opts()
        };
        let report = fix_dataset(&opts).unwrap();
        assert!(report.is_success());

        let pair = target.path().join("pair");
        assert!(pair.join("a.obj").is_file(), "parallel={parallel}");
        assert_eq!(fs::read(pair.join("a.off")).unwrap(), b"garbage bytes");
    }
}

#[test]
fn test_target_inside_source_is_not_walked() {
    let fx = Fixture::new();
    let nested = fx.source.path().join("out");
    let opts = Opts {
        target: nested.clone(),
        ..fx.opts()
    };
    let report = fix_dataset(&opts).unwrap();
    assert!(report.is_success());
    assert!(nested.join("cube.obj").is_file());
    assert!(!nested.join("out").exists());
}

#[test]
fn test_audit_record_lists_resolved_options() {
    let fx = Fixture::new();
    let opts = Opts {
        resolution: 20_000,
        ..fx.opts()
    };
    fix_dataset(&opts).unwrap();

    let text = fs::read_to_string(fx.target.path().join("fixconfig.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["resolution"], 20_000);
    assert_eq!(json["target_format"], ".obj");
    assert_eq!(json["on_tool_failure"], "abort");
    assert!(text.contains("\n    \"chunk_size\""));
}
