//! Error taxonomy for a sync run

use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort a run before any local mutation
#[derive(Error, Debug)]
pub enum FatalError {
    #[error("{0} is empty or not set")]
    MissingCredential(&'static str),

    #[error("Failed to login: {0:#}")]
    AuthenticationFailed(anyhow::Error),

    #[error("Playlist with name \"{requested}\" not found in playlist list")]
    PlaylistNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("No mobile devices registered")]
    NoDevice,

    #[error("Cannot read destination directory {}: {source}", .path.display())]
    DestinationUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Remote service error: {0:#}")]
    Remote(anyhow::Error),
}

impl FatalError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Remote(_) => 1,
            Self::MissingCredential(_) => 2,
            Self::AuthenticationFailed(_) => 3,
            Self::PlaylistNotFound { .. } => 4,
            Self::NoDevice => 5,
            Self::DestinationUnreadable { .. } => 6,
        }
    }
}

/// Failure materializing a single track
#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("download failed: {0:#}")]
    Download(anyhow::Error),

    #[error("tagging failed: {0:#}")]
    Tag(anyhow::Error),

    #[error("could not move into place: {0}")]
    Placement(#[source] std::io::Error),
}
