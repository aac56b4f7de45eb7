//! Subsonic API response models

use serde::Deserialize;

use crate::catalog::{TrackMetadata, TrackRecord};

/// Wrapper for all Subsonic API responses
#[derive(Debug, Clone, Deserialize)]
pub struct SubsonicResponse<T> {
    #[serde(rename = "subsonic-response")]
    pub subsonic_response: SubsonicResponseInner<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubsonicResponseInner<T> {
    pub status: String,
    #[serde(flatten)]
    pub data: Option<T>,
    pub error: Option<SubsonicError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubsonicError {
    pub code: i32,
    pub message: String,
}

/// Song/track entry
#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    /// OpenSubsonic extension
    #[serde(rename = "displayAlbumArtist")]
    pub display_album_artist: Option<String>,
    pub track: Option<u32>,
    #[serde(rename = "discNumber")]
    pub disc_number: Option<u32>,
    pub genre: Option<String>,
    #[serde(rename = "coverArt")]
    pub cover_art: Option<String>,
}

impl Song {
    fn has_metadata(&self) -> bool {
        self.title.is_some()
            || self.album.is_some()
            || self.artist.is_some()
            || self.display_album_artist.is_some()
            || self.track.is_some()
            || self.disc_number.is_some()
            || self.genre.is_some()
            || self.cover_art.is_some()
    }

    /// Convert into a catalog record, resolving the cover art id to a URL
    ///
    /// A bare entry carrying only its id yields a record without metadata.
    pub fn into_track_record(self, cover_art_url: impl Fn(&str) -> String) -> TrackRecord {
        if !self.has_metadata() {
            return TrackRecord::new(self.id, None);
        }

        let metadata = TrackMetadata {
            artist: self.artist,
            title: self.title,
            album: self.album,
            album_artist: self.display_album_artist,
            track_number: self.track,
            disc_number: self.disc_number,
            genre: self.genre,
            lyrics: None,
            cover_art_url: self.cover_art.as_deref().map(cover_art_url),
        };
        TrackRecord::new(self.id, Some(metadata))
    }
}

// Playlists response (getPlaylists)
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistsData {
    pub playlists: PlaylistsList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistsList {
    #[serde(default)]
    pub playlist: Vec<Playlist>,
}

/// Playlist metadata
#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

// Playlist with songs response (getPlaylist)
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistData {
    pub playlist: PlaylistWithSongs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistWithSongs {
    pub name: String,
    #[serde(default, rename = "entry")]
    pub songs: Vec<Song>,
}

// Search response (search3), used to page through the whole library
#[derive(Debug, Clone, Deserialize)]
pub struct SearchData {
    #[serde(rename = "searchResult3")]
    pub search_result: SearchResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub song: Vec<Song>,
}

// User response (getUser)
#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(rename = "streamRole", default)]
    pub stream_role: bool,
}
