//! Tracing setup.
//!
//! The TUI owns the terminal, so interactive sessions log to a file in the
//! state directory. Headless runs log to stderr. Filtering follows `RUST_LOG`.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,klear=info";
const LOG_FILE: &str = "klear.log";

/// Where the TUI writes its log.
///
/// The XDG state directory where the platform has one (Linux), otherwise the
/// local data directory.
pub fn default_log_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "klear")?;
    let dir = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
    Some(dir.join(LOG_FILE))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Send logs to `path`, creating parent directories as needed.
pub fn init_file(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // a second init in the same process keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .try_init();
}
