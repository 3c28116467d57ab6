//! File logging setup
//!
//! The terminal owns stdout/stderr while the game runs, so logs go to
//! `~/.gomoku/gomoku.log`. Initialisation failures degrade to running
//! without logs instead of aborting the game.

use std::fs::OpenOptions;
use std::path::PathBuf;

use simplelog::{Config, LevelFilter, WriteLogger};

/// Path of the log file (`~/.gomoku/gomoku.log`).
#[must_use]
pub fn log_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".gomoku").join("gomoku.log"))
}

/// Install the file logger. Safe to call once at startup.
pub fn init() {
    let Some(path) = log_file_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = WriteLogger::init(LevelFilter::Info, Config::default(), file);
}
