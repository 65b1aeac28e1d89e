use crate::cli::ActionKind;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// What one action did, printed once the action finishes.
#[derive(Debug, Clone)]
pub struct ActionSummary {
    pub action: ActionKind,
    pub plugins_scanned: usize,
    pub files_written: usize,
    pub bytes_written: u64,
    pub replaced_files: usize,
    pub skipped_archives: usize,
    pub outputs: Vec<PathBuf>,
    pub errors: Vec<String>,
    start_time: Instant,
}

impl ActionSummary {
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            plugins_scanned: 0,
            files_written: 0,
            bytes_written: 0,
            replaced_files: 0,
            skipped_archives: 0,
            outputs: Vec::new(),
            errors: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn record_output(&mut self, path: PathBuf, bytes: u64) {
        self.files_written += 1;
        self.bytes_written += bytes;
        self.outputs.push(path);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
