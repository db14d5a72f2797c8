//! meshfix CLI: mirror a mesh dataset into watertight manifolds.

use anyhow::Result;
use clap::Parser;
use meshfix::engine::arg_parser::Cli;
use meshfix::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
