//! Download, tag and place a single track

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use futures::StreamExt;
use indicatif::ProgressBar;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::filename::{derive_filename, temp_filename};
use super::report::Materialized;
use super::tagging::{CoverArt, TagWriter};
use super::transport::Transport;
use crate::catalog::{RemoteService, TrackMetadata, TrackRecord};
use crate::config::Session;
use crate::error::MaterializeError;

/// Turns a track record into a tagged file under its derived name
///
/// Partial content only ever exists under the temporary name; the final
/// name appears through a single rename once tagging is done.
pub struct Materializer {
    remote: Arc<dyn RemoteService>,
    transport: Arc<dyn Transport>,
    tagger: Arc<dyn TagWriter>,
    session: Session,
    directory: PathBuf,
}

impl Materializer {
    pub fn new(
        remote: Arc<dyn RemoteService>,
        transport: Arc<dyn Transport>,
        tagger: Arc<dyn TagWriter>,
        session: Session,
        directory: PathBuf,
    ) -> Self {
        Self {
            remote,
            transport,
            tagger,
            session,
            directory,
        }
    }

    /// Materialize one track, reporting transferred bytes on `progress`
    ///
    /// On failure the temporary file, if any, is left behind; the next run
    /// overwrites it or deletes it as stale.
    pub async fn materialize(
        &self,
        track: &TrackRecord,
        progress: &ProgressBar,
    ) -> Result<Materialized, MaterializeError> {
        let temp_path = self.directory.join(temp_filename(track));
        let final_path = self.directory.join(derive_filename(track));

        let url = self
            .remote
            .stream_url(&track.id, &self.session.device_id)
            .await
            .context("Failed to resolve stream URL")
            .map_err(MaterializeError::Download)?;

        let bytes = self
            .download_to(&url, &temp_path, progress)
            .await
            .map_err(MaterializeError::Download)?;

        match &track.metadata {
            Some(metadata) => self.tag(&temp_path, metadata).await?,
            None => warn!("Artist and title not found for \"{}\", leaving untagged", track.id),
        }

        fs::rename(&temp_path, &final_path)
            .await
            .map_err(MaterializeError::Placement)?;

        debug!("Placed {}", final_path.display());
        Ok(Materialized {
            path: final_path,
            bytes,
        })
    }

    /// Stream the body at `url` into `path`, returning the byte count
    async fn download_to(&self, url: &str, path: &Path, progress: &ProgressBar) -> anyhow::Result<u64> {
        let mut stream = self.transport.open_stream(url).await?;
        if let Some(total) = stream.content_length {
            progress.set_length(total);
        }

        let mut file = fs::File::create(path)
            .await
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let mut written: u64 = 0;
        while let Some(chunk) = stream.body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }

        file.flush().await.context("Failed to flush download")?;
        file.sync_all().await.context("Failed to sync download")?;
        Ok(written)
    }

    /// Fetch cover art (if any) and write tags on a blocking thread
    async fn tag(&self, path: &Path, metadata: &TrackMetadata) -> Result<(), MaterializeError> {
        let cover = match &metadata.cover_art_url {
            Some(url) => Some(self.fetch_cover(url).await),
            None => None,
        };

        let tagger = self.tagger.clone();
        let path = path.to_path_buf();
        let metadata = metadata.clone();

        tokio::task::spawn_blocking(move || tagger.write_tags(&path, &metadata, cover.as_ref()))
            .await
            .context("Tagging task panicked")
            .and_then(|r| r)
            .map_err(MaterializeError::Tag)
    }

    /// Cover art never fails a track: anything but a good response degrades
    /// to a link
    async fn fetch_cover(&self, url: &str) -> CoverArt {
        match self.transport.fetch(url).await {
            Ok(fetched) if fetched.is_success() => CoverArt::Embedded {
                mime_type: fetched
                    .content_type
                    .unwrap_or_else(|| "image/jpeg".to_string()),
                data: fetched.body.to_vec(),
            },
            Ok(fetched) => {
                debug!("Cover art returned status {}, linking {}", fetched.status, url);
                CoverArt::Linked(url.to_string())
            }
            Err(e) => {
                warn!("Failed to fetch cover art: {:#}", e);
                CoverArt::Linked(url.to_string())
            }
        }
    }
}
