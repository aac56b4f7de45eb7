//! Remote service contract

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Device, PlaylistSnapshot, TrackRecord};

/// Operations the sync core needs from a remote music service
///
/// Implementations own authentication and transport details. Failures of
/// `check_session`, `playlists` and `devices` are fatal to a run; failures of
/// `stream_url` only fail the track being materialized.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Verify that the configured credentials yield a usable session
    async fn check_session(&self) -> Result<()>;

    /// Every track in the user's library
    async fn library_tracks(&self) -> Result<Vec<TrackRecord>>;

    /// Every playlist with its tracks
    async fn playlists(&self) -> Result<Vec<PlaylistSnapshot>>;

    /// Playback devices registered with the account
    async fn devices(&self) -> Result<Vec<Device>>;

    /// Resolve a short-lived streaming URL for a track
    async fn stream_url(&self, track_id: &str, device_id: &str) -> Result<String>;
}
