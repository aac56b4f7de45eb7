//! Track, playlist and device records as vended by the remote catalog

use std::collections::HashMap;

/// Descriptive metadata attached to a track
///
/// Every field is optional: remote catalogs routinely return partial records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
    pub genre: Option<String>,
    pub lyrics: Option<String>,
    pub cover_art_url: Option<String>,
}

/// A single song known to the remote catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Opaque identifier, stable across the catalog
    pub id: String,
    /// Metadata bundle, absent when the track is known only by identifier
    pub metadata: Option<TrackMetadata>,
}

impl TrackRecord {
    pub fn new(id: impl Into<String>, metadata: Option<TrackMetadata>) -> Self {
        Self {
            id: id.into(),
            metadata,
        }
    }
}

/// A named, ordered list of tracks as it existed at fetch time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSnapshot {
    pub name: String,
    pub tracks: Vec<TrackRecord>,
}

impl PlaylistSnapshot {
    /// Fill in metadata for entries that arrived without any, using the
    /// library listing keyed by track identifier.
    ///
    /// Entries that already carry metadata are left untouched. Entries missing
    /// from the library stay bare and fall back to identifier naming.
    pub fn with_library_metadata(mut self, library: &HashMap<String, TrackRecord>) -> Self {
        for track in self.tracks.iter_mut().filter(|t| t.metadata.is_none()) {
            if let Some(known) = library.get(&track.id) {
                track.metadata = known.metadata.clone();
            }
        }
        self
    }
}

/// A playback device registered with the remote account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
}

impl Device {
    /// Identifier in the form the streaming endpoint expects (no `0x` prefix)
    pub fn stream_id(&self) -> &str {
        self.id.strip_prefix("0x").unwrap_or(&self.id)
    }
}

/// Index a library listing by track identifier
pub fn index_library(tracks: Vec<TrackRecord>) -> HashMap<String, TrackRecord> {
    tracks.into_iter().map(|t| (t.id.clone(), t)).collect()
}
