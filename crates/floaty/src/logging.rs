//! File logging. The terminal belongs to the UI, so events go to a log file.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "floaty.log";

/// Install the global subscriber. Returns the log path, or `None` when logging is unavailable.
pub fn init() -> Option<PathBuf> {
    let dir = ProjectDirs::from("", "", "floaty")?
        .data_local_dir()
        .to_path_buf();
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join(LOG_FILE);
    let file = File::options().create(true).append(true).open(&path).ok()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}
