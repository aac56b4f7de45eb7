//! CLI module for gmusicsync

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub mod commands;
pub mod credentials;

pub use credentials::Credentials;

use crate::config::{SyncConfig, DEFAULT_PARALLEL, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(name = "gmusicsync", about = "Mirror a remote playlist into a local directory")]
#[command(version, author)]
pub struct Cli {
    /// Music server URL
    #[arg(long, env = "GMUSICSYNC_SERVER")]
    pub server: Option<String>,

    /// Account email (username)
    #[arg(long, env = "GMUSICSYNC_EMAIL")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "GMUSICSYNC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Playlist name
    #[arg(long)]
    pub playlist: String,

    /// Path to sync playlist to
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Number of parallel downloads
    #[arg(short, long, default_value_t = DEFAULT_PARALLEL)]
    pub parallel: usize,

    /// Per-request network timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Dry run - show what would change without touching the directory
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Run settings derived from the arguments
    pub fn sync_config(&self) -> SyncConfig {
        let mut config = SyncConfig::new(self.path.clone(), self.playlist.clone());
        config.parallel = self.parallel;
        config.request_timeout = Duration::from_secs(self.timeout);
        config.dry_run = self.dry_run;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "gmusicsync",
            "--server",
            "https://music.example.com",
            "--email",
            "me@example.com",
            "--password",
            "hunter2",
            "--playlist",
            "Chill",
            "-p",
            "8",
            "/music/chill",
        ])
        .unwrap();

        assert_eq!(cli.email.as_deref(), Some("me@example.com"));
        assert_eq!(cli.playlist, "Chill");

        let config = cli.sync_config();
        assert_eq!(config.destination, PathBuf::from("/music/chill"));
        assert_eq!(config.parallel, 8);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_playlist_and_path_required() {
        assert!(Cli::try_parse_from(["gmusicsync", "/music"]).is_err());
        assert!(Cli::try_parse_from(["gmusicsync", "--playlist", "Chill"]).is_err());
    }
}
