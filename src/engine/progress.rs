//! Progress bar utilities for displaying processing status

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = " entries"
    )))
}

/// Bar over `total` entries when `verbose`, otherwise nothing.
pub fn setup_progress(verbose: bool, total: usize) -> Option<ProgressBar> {
    verbose.then(|| create_progress_bar(ProgressBarConfig::new(total, "Fixing", Animation::Classic)))
}

/// Update progress bar if available.
/// Uses try_lock so a contended bar never blocks the caller; the next update catches up.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Counts completions and pushes them to the bar every `chunk_size` items.
pub struct BatchedProgress<'a> {
    bar: Option<&'a ProgressBar>,
    pending: usize,
    chunk_size: usize,
}

impl<'a> BatchedProgress<'a> {
    pub fn new(bar: Option<&'a ProgressBar>, chunk_size: usize) -> Self {
        Self {
            bar,
            pending: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn tick(&mut self) {
        self.pending += 1;
        if self.pending >= self.chunk_size {
            self.flush();
        }
    }

    /// Push whatever is pending (call once after the loop).
    pub fn flush(&mut self) {
        if let Some(bar) = self.bar
            && self.pending > 0
        {
            update_progress_bar(bar, self.pending);
        }
        self.pending = 0;
    }
}

impl Drop for BatchedProgress<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}
