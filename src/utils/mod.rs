pub mod audit;
pub mod config;
pub mod fd_limit;
pub mod logger;
pub mod scratch;
pub mod settings_file;

pub use audit::write_audit_record;
pub use config::*;
pub use fd_limit::{FDS_PER_WORKER, cap_workers, max_open_fds, max_workers_by_fd_limit};
pub use logger::setup_logging;
pub use scratch::{ScratchFiles, prepare_scratch_dir, scratch_path};
pub use settings_file::{SettingsFile, apply_file_to_opts, load_settings_file, read_settings_file};
