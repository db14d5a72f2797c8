use clap::Parser;
use std::path::PathBuf;

use crate::ToolFailurePolicy;
use crate::utils::config::PackagePaths;

/// Fix a 3D dataset recursively into watertight manifolds.
///
/// Copy-only: the source tree is never changed. Every field is optional so that
/// `meshfix.toml` and the environment can fill in what the command line leaves out.
#[derive(Clone, Debug, Default, Parser)]
#[command(name = "meshfix")]
#[command(
    about = "Mirror a mesh dataset into watertight manifolds using external repair tools. The source is never changed."
)]
pub struct Cli {
    /// Octree leaf count for the manifold tool; output face count grows linearly with it. Default: 5000.
    #[arg(long, short = 'r', value_parser = clap::value_parser!(u32))]
    pub resolution: Option<u32>,

    /// Simplify the manifold afterwards.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub simplify: Option<bool>,

    /// Have the simplifier verify manifoldness and write nothing if the check fails. Default: true.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub manifold_check: Option<bool>,

    /// Simplify until the face count is at most this. Default: 5000.
    #[arg(long)]
    pub face_num: Option<u64>,

    /// Simplify until the quadric error reaches this. Default: 1e-6.
    #[arg(long)]
    pub max_cost: Option<f64>,

    /// Simplify until current/original face count drops to this. Default: 0.40.
    #[arg(long)]
    pub max_ratio: Option<f64>,

    /// Worker count when running in parallel; 0 uses all available cores. Default: 8 (or `processes` from the environment).
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Process entries in parallel. Default: true.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub parallel: Option<bool>,

    /// Source folder. Default: data-raw.
    #[arg(long, short = 's')]
    pub source: Option<PathBuf>,

    /// Target folder. Default: data-fixed.
    #[arg(long, short = 't')]
    pub target: Option<PathBuf>,

    /// Manifold executable. Default: `manifold` from the environment / .env, else `manifold` on PATH.
    #[arg(long)]
    pub manifold_exec: Option<String>,

    /// Simplify executable. Default: `simplify` from the environment / .env, else `simplify` on PATH.
    #[arg(long)]
    pub simplify_exec: Option<String>,

    /// Suffix of the converted files, with the leading dot. Default: .obj.
    #[arg(long)]
    pub target_format: Option<String>,

    /// Directory for intermediate files. Default: the OS temp directory.
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Entries handed to a worker at a time. Default: 1000.
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// On manifold/simplify failure: abort the entry, or copy it verbatim. Default: abort.
    #[arg(long, value_enum)]
    pub on_tool_failure: Option<ToolFailurePolicy>,

    /// Settings file. Default: meshfix.toml in the working directory, if present.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logs and a progress bar).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    /// Settings file path, defaulting to the package settings filename in the working directory.
    pub fn settings_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(PackagePaths::get().settings_filename()))
    }
}
