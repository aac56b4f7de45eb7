//! Subsonic API HTTP client

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::auth::{generate_auth_params, CLIENT_NAME};
use super::models::*;
use crate::catalog::{Device, PlaylistSnapshot, RemoteService, TrackRecord};

/// Page size used when walking the library with search3
const LIBRARY_PAGE_SIZE: usize = 500;

/// HTTP client for Subsonic REST API
#[derive(Clone)]
pub struct SubsonicClient {
    base_url: String,
    username: String,
    password: String,
    http_client: Client,
}

impl SubsonicClient {
    /// Create a new Subsonic client
    pub fn new(base_url: &str, username: &str, password: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("Invalid server URL: {}", base_url))?;
        let base_url = parsed.as_str().trim_end_matches('/').to_string();

        let http_client = Client::builder()
            .user_agent(concat!("gmusicsync/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url,
            username: username.to_string(),
            password: password.to_string(),
            http_client,
        })
    }

    /// Build URL with authentication parameters, identifying as `client`
    fn build_url_as(&self, endpoint: &str, client: &str) -> String {
        let params = generate_auth_params(&self.username, &self.password, client);
        let query: String = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}/rest/{}?{}", self.base_url, endpoint, query)
    }

    fn build_url(&self, endpoint: &str) -> String {
        self.build_url_as(endpoint, CLIENT_NAME)
    }

    /// GET an endpoint and decode the response envelope
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<Option<T>> {
        let response: SubsonicResponse<T> = self
            .http_client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", what))?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))?;

        self.check_response(&response)?;
        Ok(response.subsonic_response.data)
    }

    /// Test connection and credentials
    pub async fn ping(&self) -> Result<()> {
        let url = self.build_url("ping");
        debug!("Pinging Subsonic server at {}", self.base_url);
        self.get_json::<()>(&url, "ping").await.map(|_| ())
    }

    /// Get all playlists (names only)
    pub async fn get_playlists(&self) -> Result<Vec<Playlist>> {
        let url = self.build_url("getPlaylists");
        let playlists = self
            .get_json::<PlaylistsData>(&url, "playlists")
            .await?
            .map(|d| d.playlists.playlist)
            .unwrap_or_default();

        debug!("Found {} playlists", playlists.len());
        Ok(playlists)
    }

    /// Get playlist details with songs
    pub async fn get_playlist(&self, id: &str) -> Result<PlaylistWithSongs> {
        let url = format!("{}&id={}", self.build_url("getPlaylist"), urlencoding::encode(id));
        debug!("Fetching playlist {}", id);

        self.get_json::<PlaylistData>(&url, "playlist")
            .await?
            .map(|d| d.playlist)
            .ok_or_else(|| anyhow::anyhow!("Playlist {} not found", id))
    }

    /// Fetch one page of songs from the whole library
    pub async fn search_songs(&self, offset: usize, count: usize) -> Result<Vec<Song>> {
        let url = format!(
            "{}&query=&artistCount=0&albumCount=0&songCount={}&songOffset={}",
            self.build_url("search3"),
            count,
            offset
        );

        Ok(self
            .get_json::<SearchData>(&url, "library page")
            .await?
            .map(|d| d.search_result.song)
            .unwrap_or_default())
    }

    /// Get the authenticated user's account record
    pub async fn get_user(&self) -> Result<User> {
        let url = format!(
            "{}&username={}",
            self.build_url("getUser"),
            urlencoding::encode(&self.username)
        );

        self.get_json::<UserData>(&url, "user")
            .await?
            .map(|d| d.user)
            .ok_or_else(|| anyhow::anyhow!("User {} not found", self.username))
    }

    /// Get cover art URL
    pub fn get_cover_art_url(&self, id: &str) -> String {
        format!("{}&id={}", self.build_url("getCoverArt"), urlencoding::encode(id))
    }

    /// Get streaming URL for a song, registered under the given player name
    pub fn get_stream_url(&self, id: &str, player: &str) -> String {
        format!(
            "{}&id={}&format=mp3",
            self.build_url_as("stream", player),
            urlencoding::encode(id)
        )
    }

    /// Check response status and return error if failed
    fn check_response<T>(&self, response: &SubsonicResponse<T>) -> Result<()> {
        if response.subsonic_response.status != "ok" {
            if let Some(error) = &response.subsonic_response.error {
                anyhow::bail!("Subsonic error {}: {}", error.code, error.message);
            }
            anyhow::bail!("Unknown Subsonic error");
        }
        Ok(())
    }

    fn song_to_record(&self, song: Song) -> TrackRecord {
        song.into_track_record(|id| self.get_cover_art_url(id))
    }
}

#[async_trait]
impl RemoteService for SubsonicClient {
    async fn check_session(&self) -> Result<()> {
        self.ping().await
    }

    async fn library_tracks(&self) -> Result<Vec<TrackRecord>> {
        let mut tracks = Vec::new();
        loop {
            let page = self.search_songs(tracks.len(), LIBRARY_PAGE_SIZE).await?;
            let page_len = page.len();
            tracks.extend(page.into_iter().map(|song| self.song_to_record(song)));
            if page_len < LIBRARY_PAGE_SIZE {
                break;
            }
        }

        debug!("Library holds {} tracks", tracks.len());
        Ok(tracks)
    }

    async fn playlists(&self) -> Result<Vec<PlaylistSnapshot>> {
        let summaries = self.get_playlists().await?;
        let detailed = try_join_all(summaries.iter().map(|p| self.get_playlist(&p.id))).await?;

        Ok(detailed
            .into_iter()
            .map(|p| PlaylistSnapshot {
                name: p.name,
                tracks: p.songs.into_iter().map(|s| self.song_to_record(s)).collect(),
            })
            .collect())
    }

    /// Subsonic keys players by client name rather than keeping a device
    /// registry, so the account exposes one player when it may stream and
    /// none otherwise.
    async fn devices(&self) -> Result<Vec<Device>> {
        let user = self.get_user().await?;
        if !user.stream_role {
            debug!("User {} lacks the stream role", user.username);
            return Ok(Vec::new());
        }

        Ok(vec![Device {
            id: CLIENT_NAME.to_string(),
            name: Some(format!("{} ({})", CLIENT_NAME, user.username)),
        }])
    }

    async fn stream_url(&self, track_id: &str, device_id: &str) -> Result<String> {
        Ok(self.get_stream_url(track_id, device_id))
    }
}
