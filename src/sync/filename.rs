//! Canonical on-disk names for tracks

use crate::catalog::TrackRecord;
use crate::utils::strip_unsafe_chars;

/// Extension of every file the sync produces
pub const EXTENSION: &str = "mp3";

/// Name a track is stored under once fully materialized
///
/// `"<artist> - <title> [<album>].mp3"` with unsafe characters stripped, or
/// `"<id>.mp3"` when the track lacks an artist or a title.
pub fn derive_filename(track: &TrackRecord) -> String {
    let Some(metadata) = &track.metadata else {
        return temp_filename(track);
    };
    let (Some(artist), Some(title)) = (&metadata.artist, &metadata.title) else {
        return temp_filename(track);
    };

    let album = metadata.album.as_deref().unwrap_or("");
    let stem = strip_unsafe_chars(&format!("{} - {} [{}]", artist, title, album));
    format!("{}.{}", stem, EXTENSION)
}

/// Name a track is written under while its download is in flight
///
/// Identifiers are opaque, so they pass through the same character filter as
/// derived names; one made only of filtered characters is hex-encoded
/// instead. The name never leaves the destination directory.
///
/// Tracks without an artist or a title are stored under this same name, so
/// for them a partial file left by an interrupted run looks present to the
/// next run. Delete it by hand to force a fresh download.
pub fn temp_filename(track: &TrackRecord) -> String {
    let mut stem = strip_unsafe_chars(&track.id);
    if stem.is_empty() {
        stem = hex::encode(&track.id);
    }
    format!("{}.{}", stem, EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TrackMetadata;

    fn track(artist: Option<&str>, title: Option<&str>, album: Option<&str>) -> TrackRecord {
        TrackRecord::new(
            "Tabc123",
            Some(TrackMetadata {
                artist: artist.map(String::from),
                title: title.map(String::from),
                album: album.map(String::from),
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_full_metadata() {
        let t = track(Some("A"), Some("Song"), Some("Album"));
        assert_eq!(derive_filename(&t), "A - Song [Album].mp3");
    }

    #[test]
    fn test_missing_album_left_empty() {
        let t = track(Some("A"), Some("Song"), None);
        assert_eq!(derive_filename(&t), "A - Song [].mp3");
    }

    #[test]
    fn test_no_metadata_falls_back_to_id() {
        let t = TrackRecord::new("Tabc123", None);
        assert_eq!(derive_filename(&t), "Tabc123.mp3");
    }

    #[test]
    fn test_missing_artist_or_title_falls_back_to_id() {
        assert_eq!(derive_filename(&track(None, Some("Song"), Some("X"))), "Tabc123.mp3");
        assert_eq!(derive_filename(&track(Some("A"), None, Some("X"))), "Tabc123.mp3");
        assert_eq!(derive_filename(&track(None, None, None)), "Tabc123.mp3");
    }

    #[test]
    fn test_unsafe_characters_stripped() {
        let t = track(Some("AC/DC"), Some("T.N.T.?"), Some("High Voltage: Remastered"));
        assert_eq!(derive_filename(&t), "ACDC - TNT [High Voltage Remastered].mp3");
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = track(Some("Björk"), Some("Jóga*"), Some("Homogenic"));
        let b = a.clone();
        assert_eq!(derive_filename(&a), derive_filename(&b));
        assert_eq!(derive_filename(&a), "Björk - Jóga [Homogenic].mp3");
    }

    #[test]
    fn test_temp_filename_uses_id() {
        let t = track(Some("A"), Some("Song"), Some("Album"));
        assert_eq!(temp_filename(&t), "Tabc123.mp3");
    }

    #[test]
    fn test_path_like_ids_stay_in_directory() {
        assert_eq!(temp_filename(&TrackRecord::new("../x", None)), "x.mp3");
        assert_eq!(derive_filename(&TrackRecord::new("a/b\\c", None)), "abc.mp3");
        assert_eq!(temp_filename(&TrackRecord::new("..", None)), "2e2e.mp3");
    }
}
