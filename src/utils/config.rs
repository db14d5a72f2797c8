//! Application configuration constants.
//! Defaults and tuning in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    settings_filename: String,
    scratch_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                settings_filename: format!("{pkg}.toml"),
                scratch_prefix: format!("{pkg}-"),
            }
        })
    }

    /// Optional settings file looked up in the working directory.
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }

    /// Prefix of every scratch file name (followed by a v4 UUID).
    pub fn scratch_prefix(&self) -> &str {
        &self.scratch_prefix
    }

    /// Audit record written at the target root before processing.
    pub fn audit_filename(&self) -> &'static str {
        AUDIT_FILENAME
    }
}

/// Name of the invocation record in the target root.
pub const AUDIT_FILENAME: &str = "fixconfig.json";

// ---- Stage defaults ----

/// Defaults for CLI options and stage parameters.
pub struct StageDefaults;

impl StageDefaults {
    pub const SOURCE: &'static str = "data-raw";
    pub const TARGET: &'static str = "data-fixed";
    pub const TARGET_FORMAT: &'static str = ".obj";
    /// Octree leaf count; output face count grows about linearly with it.
    pub const RESOLUTION: u32 = 5_000;
    pub const FACE_NUM: u64 = 5_000;
    pub const MAX_COST: f64 = 1e-6;
    pub const MAX_RATIO: f64 = 0.40;
    pub const WORKERS: usize = 8;
    pub const MANIFOLD_EXEC: &'static str = "manifold";
    pub const SIMPLIFY_EXEC: &'static str = "simplify";
}

// ---- Dispatch ----

/// Entries handed to a worker per pull from the queue.
pub const DISPATCH_CHUNK_SIZE: usize = 1000;

/// Chunks buffered in the work queue per worker.
pub const QUEUE_DEPTH_PER_WORKER: usize = 2;

// ---- Progress ----

pub struct ProgressConsts;

impl ProgressConsts {
    /// Completed entries between progress bar updates (reduce lock contention).
    pub const PROGRESS_UPDATE_BATCH_SIZE: usize = 16;
}
