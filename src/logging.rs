use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "QUIZDESK_LOG";
const DEFAULT_FILTER: &str = "quizdesk=info";

pub fn default_log_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "quizdesk").map(|dirs| dirs.data_local_dir().join("quizdesk.log"))
}

/// Send tracing output to `path`. The terminal belongs to the UI, so when the
/// file cannot be opened logging is left off.
pub fn init(path: Option<&Path>) {
    let Some(path) = path else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(_) => return,
    };

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
