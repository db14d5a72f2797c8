//! CLI command handler: resolve options once, run the pipeline, report.

use anyhow::Result;
use log::info;
use std::path::Path;

use crate::engine::arg_parser::Cli;
use crate::engine::env::{Environment, MANIFOLD_VAR, SIMPLIFY_VAR};
use crate::pipeline::{check_for_failures, fix_dataset};
use crate::utils::{
    SettingsFile, apply_file_to_opts, load_settings_file, read_settings_file, setup_logging,
};
use crate::{Opts, RunReport};

/// Overwrite opts field from the command line when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $cli.$field.clone() {
                $opts.$field = v;
            }
        )+
    };
}

/// Build the run's options. Precedence: command line > environment > settings file > defaults.
pub fn resolve_opts(cli: &Cli, env: &Environment, file: Option<&SettingsFile>) -> Result<Opts> {
    let mut opts = Opts::default();
    if let Some(file) = file {
        apply_file_to_opts(file, &mut opts);
    }

    opts.manifold_exec = env.resolve(MANIFOLD_VAR, Some(&opts.manifold_exec))?;
    opts.simplify_exec = env.resolve(SIMPLIFY_VAR, Some(&opts.simplify_exec))?;
    if let Some(n) = env.processes()? {
        opts.workers = n;
    }

    apply_cli_opt!(
        cli,
        opts,
        resolution,
        simplify,
        manifold_check,
        face_num,
        max_cost,
        max_ratio,
        workers,
        parallel,
        source,
        target,
        manifold_exec,
        simplify_exec,
        target_format,
        scratch_dir,
        chunk_size,
        on_tool_failure,
        verbose,
    );
    Ok(opts)
}

/// Run the fix over the configured tree. Fails on configuration errors or if any entry failed.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose.unwrap_or(false));

    let file = settings_for(cli)?;
    let env = Environment::from_process(Path::new("."));
    let opts = resolve_opts(cli, &env, file.as_ref())?;

    let report = fix_dataset(&opts)?;
    print_summary(&report);
    check_for_failures(&report)
}

/// Settings file for this run. An explicit `--config` must exist and parse; the default
/// file is optional and only warned about when invalid.
pub fn settings_for(cli: &Cli) -> Result<Option<SettingsFile>> {
    match &cli.config {
        Some(path) => read_settings_file(path).map(Some),
        None => Ok(load_settings_file(&cli.settings_path())),
    }
}

fn print_summary(report: &RunReport) {
    info!(
        "Done: {} converted, {} copied verbatim, {} directories, {} skipped, {} failed",
        report.converted,
        report.fallback_copied,
        report.mirrored_dirs,
        report.skipped,
        report.failures.len()
    );
}
