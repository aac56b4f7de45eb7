//! Local directory state capture

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::FatalError;

/// Absolute paths of the files directly inside the destination directory
pub type LocalFileSet = HashSet<PathBuf>;

/// Result of preparing the destination for a run
#[derive(Debug)]
pub struct ScanOutcome {
    /// Absolute destination directory
    pub directory: PathBuf,
    /// Files present before any mutation
    pub files: LocalFileSet,
    /// Whether the directory had to be created
    pub created: bool,
}

/// Resolve a directory to an absolute path without touching the filesystem
pub fn absolute_dir(directory: &Path) -> io::Result<PathBuf> {
    std::path::absolute(directory)
}

/// List the files directly under `directory`
///
/// Subdirectories (and symlinks to them) are skipped and never entered. A
/// missing directory is created and reported as empty.
pub async fn scan(directory: &Path) -> Result<ScanOutcome, FatalError> {
    let unreadable = |source| FatalError::DestinationUnreadable {
        path: directory.to_path_buf(),
        source,
    };

    let directory = absolute_dir(directory).map_err(unreadable)?;

    if !fs::try_exists(&directory).await.map_err(unreadable)? {
        info!("Creating destination directory {}", directory.display());
        fs::create_dir_all(&directory).await.map_err(unreadable)?;
        return Ok(ScanOutcome {
            directory,
            files: LocalFileSet::new(),
            created: true,
        });
    }

    let mut entries = fs::read_dir(&directory).await.map_err(unreadable)?;
    let mut files = LocalFileSet::new();

    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        let path = entry.path();
        // Follow symlinks so links to directories are skipped too; a dangling
        // link is still a file entry that may need deleting.
        let is_dir = match fs::metadata(&path).await {
            Ok(meta) => meta.is_dir(),
            Err(_) => entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false),
        };
        if !is_dir {
            files.insert(path);
        }
    }

    debug!("Found {} files in {}", files.len(), directory.display());
    Ok(ScanOutcome {
        directory,
        files,
        created: false,
    })
}
