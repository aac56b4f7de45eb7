//! Per-item outcomes collected during a run

use std::io;
use std::path::PathBuf;

use crate::error::MaterializeError;

/// Outcome of the deletion phase
#[derive(Debug, Default)]
pub struct DeletionReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl DeletionReport {
    pub fn record(&mut self, path: PathBuf, outcome: io::Result<()>) {
        match outcome {
            Ok(()) => self.deleted.push(path),
            Err(e) => self.failed.push((path, e)),
        }
    }
}

/// Outcome of the download phase
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Final paths of tracks materialized this run
    pub downloaded: Vec<PathBuf>,
    /// Track identifiers that failed, with the reason
    pub failed: Vec<(String, MaterializeError)>,
    /// Bytes received across all successful transfers
    pub bytes_downloaded: u64,
}

impl DownloadReport {
    pub fn record(&mut self, track_id: String, outcome: Result<Materialized, MaterializeError>) {
        match outcome {
            Ok(done) => {
                self.bytes_downloaded += done.bytes;
                self.downloaded.push(done.path);
            }
            Err(e) => self.failed.push((track_id, e)),
        }
    }
}

/// A track placed under its final name
#[derive(Debug, Clone)]
pub struct Materialized {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Aggregate result of a sync run
#[derive(Debug, Default)]
pub struct SyncReport {
    pub playlist: String,
    pub track_count: usize,
    /// Tracks already present before the run
    pub satisfied: usize,
    pub deletions: DeletionReport,
    pub downloads: DownloadReport,
    /// Set when a shutdown signal cut the download phase short
    pub interrupted: bool,
    /// Set when the plan was only printed
    pub dry_run: bool,
}

impl SyncReport {
    pub fn failure_count(&self) -> usize {
        self.deletions.failed.len() + self.downloads.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_counted_across_phases() {
        let mut report = SyncReport::default();
        report
            .deletions
            .record(PathBuf::from("/a.mp3"), Err(io::ErrorKind::NotFound.into()));
        report.deletions.record(PathBuf::from("/b.mp3"), Ok(()));
        report.downloads.record(
            "t1".to_string(),
            Err(MaterializeError::Download(anyhow::anyhow!("timed out"))),
        );
        report.downloads.record(
            "t2".to_string(),
            Ok(Materialized {
                path: PathBuf::from("/c.mp3"),
                bytes: 10,
            }),
        );

        assert_eq!(report.failure_count(), 2);
        assert_eq!(report.deletions.deleted, vec![PathBuf::from("/b.mp3")]);
        assert_eq!(report.downloads.bytes_downloaded, 10);
    }
}
