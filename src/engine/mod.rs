//! Engine module: command line, environment, external tools, progress, path helpers

pub mod arg_parser;
pub mod cli;
pub mod env;
pub mod external;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{handle_run, resolve_opts};
pub use env::Environment;
pub use external::run_tool;
pub use tools::{mirror_path, path_relative_to};
