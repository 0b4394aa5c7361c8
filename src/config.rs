//! Daemon configuration
//!
//! Paths and intervals for the log tailer and the autosave task. Both paths
//! can be overridden through environment variables, which is also how the
//! tests point the daemon at temporary files.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the game log path
pub const LOG_PATH_ENV: &str = "DBD_LOG_PATH";

/// Environment variable overriding the store file path
pub const DATA_PATH_ENV: &str = "LOOP_DATA_PATH";

/// Relative location of the game log under the platform app-data root
const LOG_PATH_SUFFIX: &str = "Local/DeadByDaylight/Saved/Logs/DeadByDaylight.log";

/// Configuration for the monitor daemon
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Path to the game log file (appended to by the game, read-only here)
    pub log_path: PathBuf,
    /// Path to the persisted store file
    pub data_path: PathBuf,
    /// How long the tailer sleeps when no new line is available
    pub poll_interval: Duration,
    /// Period of the autosave task
    pub save_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            data_path: default_data_path(),
            poll_interval: Duration::from_millis(1000),
            save_interval: Duration::from_millis(5000),
        }
    }
}

impl MonitorConfig {
    /// Build the configuration from the environment, falling back to the
    /// platform defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = env::var(LOG_PATH_ENV) {
            config.log_path = absolutize(&path);
        }
        if let Ok(path) = env::var(DATA_PATH_ENV) {
            config.data_path = absolutize(&path);
        }
        config
    }

    /// Config with explicit paths (used by tests)
    pub fn with_paths<P: AsRef<Path>, Q: AsRef<Path>>(log_path: P, data_path: Q) -> Self {
        Self {
            log_path: log_path.as_ref().to_path_buf(),
            data_path: data_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }
}

fn absolutize(path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

/// The game writes its log under the roaming app-data directory's sibling
/// `Local` tree on Windows; elsewhere the env override is the expected way
/// to locate it.
fn default_log_path() -> PathBuf {
    match env::var("APPDATA") {
        Ok(appdata) => {
            let appdata = PathBuf::from(appdata);
            let base = appdata.parent().map(Path::to_path_buf).unwrap_or(appdata);
            base.join(LOG_PATH_SUFFIX)
        }
        Err(_) => PathBuf::from(LOG_PATH_SUFFIX),
    }
}

fn default_data_path() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("loop.json")
}
