//! File logging for silently-handled failures.
//!
//! Read errors and AI failures never interrupt the session, so they are
//! recorded here instead. Logs go to `casa-gestao.log` in the app data
//! directory; if the logger was never initialized, logging is a no-op.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The log filename within the data directory.
const LOG_FILENAME: &str = "casa-gestao.log";

/// Maximum log file size before rotation (1MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Global log file handle (lazily initialized).
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// Get the path to the log file under a data directory.
#[must_use]
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILENAME)
}

/// Initialize the logger for a data directory.
///
/// Should be called once at startup. Rotates the previous log aside when it
/// has grown past the size limit.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn init(data_dir: &Path) -> std::io::Result<()> {
    let path = log_path(data_dir);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    if path.exists() {
        if let Ok(metadata) = fs::metadata(&path) {
            if metadata.len() > MAX_LOG_SIZE {
                let backup = path.with_extension("log.old");
                let _ = fs::rename(&path, backup);
            }
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(file);
    }

    Ok(())
}

/// Write a timestamped line to the log. No-op when uninitialized.
pub fn log(message: &str) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(file) = guard.as_mut() {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let _ = writeln!(file, "[{timestamp}] {message}");
            let _ = file.flush();
        }
    }
}

/// Shut the logger down, releasing the file handle.
pub fn shutdown() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = None;
    }
}
