//! Playlist versus directory reconciliation

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::warn;

use super::filename::derive_filename;
use super::scanner::LocalFileSet;
use crate::catalog::TrackRecord;

/// Work required to make the directory match the playlist
#[derive(Debug, Default)]
pub struct ReconciliationResult {
    /// Local files that match no current track
    pub to_delete: LocalFileSet,
    /// Tracks whose file is not present yet, in playlist order
    pub to_download: Vec<TrackRecord>,
    /// Number of playlist tracks whose file is already in place
    pub satisfied: usize,
}

impl ReconciliationResult {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_download.is_empty()
    }

    /// Deletion targets in a stable order
    pub fn sorted_deletions(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.to_delete.iter().cloned().collect();
        paths.sort();
        paths
    }
}

/// Compute stale files and missing tracks
///
/// A track is satisfied when a file under its derived name was present at
/// scan time, or when an earlier entry already scheduled that name. Each
/// name is downloaded at most once per run, so repeated playlist entries
/// never share a temporary file. Distinct tracks deriving the same name are
/// logged; the first one listed owns the file.
pub fn reconcile(
    directory: &Path,
    tracks: &[TrackRecord],
    local_files: &LocalFileSet,
) -> ReconciliationResult {
    let mut result = ReconciliationResult {
        to_delete: local_files.clone(),
        ..Default::default()
    };
    let mut claimed: HashMap<String, &str> = HashMap::with_capacity(tracks.len());
    let mut scheduled: HashSet<PathBuf> = HashSet::new();

    for track in tracks {
        let filename = derive_filename(track);

        if let Some(first) = claimed.get(&filename) {
            if *first != track.id {
                warn!(
                    "Tracks {} and {} both map to \"{}\"; only one file will be kept",
                    first, track.id, filename
                );
            }
        } else {
            claimed.insert(filename.clone(), &track.id);
        }

        let path = directory.join(&filename);
        if local_files.contains(&path) {
            result.to_delete.remove(&path);
            result.satisfied += 1;
        } else if scheduled.insert(path) {
            result.to_download.push(track.clone());
        } else {
            result.satisfied += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TrackMetadata;
    use std::collections::HashSet;

    const DIR: &str = "/music";

    fn track(id: &str, artist: &str, title: &str, album: &str) -> TrackRecord {
        TrackRecord::new(
            id,
            Some(TrackMetadata {
                artist: Some(artist.to_string()),
                title: Some(title.to_string()),
                album: Some(album.to_string()),
                ..Default::default()
            }),
        )
    }

    fn local(names: &[&str]) -> LocalFileSet {
        names.iter().map(|n| Path::new(DIR).join(n)).collect()
    }

    #[test]
    fn test_stale_file_deleted_and_new_track_downloaded() {
        let present = track("t1", "A", "Song", "Album");
        let fresh = track("t2", "B", "New", "Record");
        let files = local(&["A - Song [Album].mp3", "Stale - Old [X].mp3"]);

        let result = reconcile(Path::new(DIR), &[present, fresh.clone()], &files);

        assert_eq!(result.to_delete, local(&["Stale - Old [X].mp3"]));
        assert_eq!(result.to_download, vec![fresh]);
        assert_eq!(result.satisfied, 1);
    }

    #[test]
    fn test_empty_directory_downloads_everything() {
        let tracks = vec![track("t1", "A", "One", "X"), TrackRecord::new("t2", None)];

        let result = reconcile(Path::new(DIR), &tracks, &LocalFileSet::new());

        assert!(result.to_delete.is_empty());
        assert_eq!(result.to_download, tracks);
    }

    #[test]
    fn test_empty_playlist_deletes_everything() {
        let files = local(&["a.mp3", "b.mp3"]);

        let result = reconcile(Path::new(DIR), &[], &files);

        assert_eq!(result.to_delete, files);
        assert!(result.to_download.is_empty());
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let tracks = vec![
            track("t1", "A", "One", "X"),
            track("t2", "B", "Two", "Y"),
            TrackRecord::new("t3", None),
        ];
        let first = reconcile(Path::new(DIR), &tracks, &local(&["old.mp3"]));

        // Directory after the first run: stale files gone, downloads in place
        let after: LocalFileSet = first
            .to_download
            .iter()
            .map(|t| Path::new(DIR).join(derive_filename(t)))
            .collect();

        let second = reconcile(Path::new(DIR), &tracks, &after);
        assert!(second.is_empty());
        assert_eq!(second.satisfied, tracks.len());
    }

    #[test]
    fn test_every_track_lands_in_exactly_one_bucket() {
        let tracks = vec![
            track("t1", "A", "One", "X"),
            track("t2", "B", "Two", "Y"),
            track("t3", "C", "Three", "Z"),
        ];
        let files = local(&["B - Two [Y].mp3", "junk.mp3"]);

        let result = reconcile(Path::new(DIR), &tracks, &files);

        assert_eq!(result.satisfied + result.to_download.len(), tracks.len());
        let expected: HashSet<PathBuf> = tracks
            .iter()
            .map(|t| Path::new(DIR).join(derive_filename(t)))
            .collect();
        let kept: HashSet<PathBuf> = files.difference(&result.to_delete).cloned().collect();
        assert!(kept.is_subset(&expected));
    }

    #[test]
    fn test_colliding_tracks_share_present_file() {
        let first = track("t1", "A", "Song", "Album");
        let second = track("t2", "A", "Song?", "Album");
        let files = local(&["A - Song [Album].mp3"]);

        let result = reconcile(Path::new(DIR), &[first, second], &files);

        assert!(result.to_delete.is_empty());
        assert!(result.to_download.is_empty());
        assert_eq!(result.satisfied, 2);
    }

    #[test]
    fn test_colliding_tracks_download_name_once() {
        let first = track("t1", "A", "Song", "Album");
        let second = track("t2", "A", "Song!", "Album");

        let result = reconcile(Path::new(DIR), &[first.clone(), second], &LocalFileSet::new());

        assert_eq!(result.to_download, vec![first]);
        assert_eq!(result.satisfied, 1);
    }

    #[test]
    fn test_repeated_entry_scheduled_once() {
        let song = track("t1", "A", "Song", "Album");
        let bare = TrackRecord::new("t2", None);
        let tracks = vec![song.clone(), bare.clone(), song.clone(), bare.clone()];

        let result = reconcile(Path::new(DIR), &tracks, &LocalFileSet::new());

        assert_eq!(result.to_download, vec![song, bare]);
        assert_eq!(result.satisfied + result.to_download.len(), tracks.len());
    }
}
