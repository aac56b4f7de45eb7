//! Run configuration passed explicitly into every component

use std::path::PathBuf;
use std::time::Duration;

/// Default number of concurrent track downloads
pub const DEFAULT_PARALLEL: usize = 4;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for a single sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory mirrored against the playlist
    pub destination: PathBuf,
    /// Name of the remote playlist to mirror
    pub playlist: String,
    /// Upper bound on concurrent downloads
    pub parallel: usize,
    /// Per-request timeout for network calls
    pub request_timeout: Duration,
    /// Compute and print the plan without touching the directory
    pub dry_run: bool,
    /// Draw progress bars
    pub show_progress: bool,
}

impl SyncConfig {
    pub fn new(destination: impl Into<PathBuf>, playlist: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            playlist: playlist.into(),
            parallel: DEFAULT_PARALLEL,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dry_run: false,
            show_progress: true,
        }
    }

    /// Concurrency actually used; zero is treated as one
    pub fn effective_parallel(&self) -> usize {
        self.parallel.max(1)
    }
}

/// State resolved once at startup and shared by every materialization
#[derive(Debug, Clone)]
pub struct Session {
    /// Playback device identifier used to resolve stream URLs
    pub device_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SyncConfig::new("/music", "Chill");
        assert_eq!(config.parallel, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_zero_parallel_clamped() {
        let mut config = SyncConfig::new("/music", "Chill");
        config.parallel = 0;
        assert_eq!(config.effective_parallel(), 1);
    }
}
