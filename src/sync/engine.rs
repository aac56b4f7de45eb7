//! Sync engine orchestration

use std::future::Future;
use std::sync::Arc;

use colored::Colorize;
use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, error, info};

use super::delete::delete_all;
use super::filename::{derive_filename, temp_filename};
use super::materializer::Materializer;
use super::reconcile::{reconcile, ReconciliationResult};
use super::report::{DownloadReport, SyncReport};
use super::scanner;
use super::tagging::TagWriter;
use super::transport::Transport;
use crate::catalog::models::index_library;
use crate::catalog::{PlaylistSnapshot, RemoteService, TrackRecord};
use crate::config::{Session, SyncConfig};
use crate::error::FatalError;

/// Longest progress bar label, in characters
const LABEL_WIDTH: usize = 50;

/// Sync engine that mirrors one playlist into one directory
pub struct SyncEngine {
    remote: Arc<dyn RemoteService>,
    transport: Arc<dyn Transport>,
    tagger: Arc<dyn TagWriter>,
    config: SyncConfig,
}

impl SyncEngine {
    pub fn new(
        remote: Arc<dyn RemoteService>,
        transport: Arc<dyn Transport>,
        tagger: Arc<dyn TagWriter>,
        config: SyncConfig,
    ) -> Self {
        Self {
            remote,
            transport,
            tagger,
            config,
        }
    }

    /// Run to completion
    pub async fn run(&self) -> Result<SyncReport, FatalError> {
        self.run_until(std::future::pending()).await
    }

    /// Run until done or until `shutdown` resolves
    ///
    /// Every fatal precondition is checked before the directory is touched.
    /// Once mutation starts, per-item failures are collected in the report
    /// and never abort the run. Shutdown abandons in-flight downloads; their
    /// temporary files stay behind for the next run to overwrite.
    pub async fn run_until(
        &self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<SyncReport, FatalError> {
        let session = self.open_session().await?;
        let playlist = self.fetch_playlist().await?;
        self.say(format!(
            "Found {} songs in \"{}\" playlist",
            playlist.tracks.len(),
            playlist.name
        )
        .green());

        let scan = scanner::scan(&self.config.destination).await?;
        if scan.created {
            self.say(format!("Path \"{}\" did not exist, created it", scan.directory.display()).yellow());
        }

        let plan = reconcile(&scan.directory, &playlist.tracks, &scan.files);
        self.say(format!(
            "{} files to delete, {} files to download",
            plan.to_delete.len(),
            plan.to_download.len()
        )
        .green());
        if plan.is_empty() {
            info!("Directory already matches the playlist");
        }

        let mut report = SyncReport {
            playlist: playlist.name.clone(),
            track_count: playlist.tracks.len(),
            satisfied: plan.satisfied,
            ..Default::default()
        };

        if self.config.dry_run {
            self.print_plan(&plan);
            report.dry_run = true;
            return Ok(report);
        }

        let to_delete = plan.sorted_deletions();
        let to_download = plan.to_download;

        if !to_delete.is_empty() {
            self.say(format!("Deleting {} songs...", to_delete.len()).yellow());
            report.deletions = delete_all(to_delete, self.config.show_progress).await;
        }

        if !to_download.is_empty() {
            self.say(format!("Downloading {} songs...", to_download.len()).yellow());
            let materializer = Materializer::new(
                self.remote.clone(),
                self.transport.clone(),
                self.tagger.clone(),
                session,
                scan.directory.clone(),
            );
            let (downloads, interrupted) =
                self.download_all(&materializer, to_download, shutdown).await;
            report.downloads = downloads;
            report.interrupted = interrupted;
        }

        info!(
            "Sync finished: {} deleted, {} downloaded, {} failed",
            report.deletions.deleted.len(),
            report.downloads.downloaded.len(),
            report.failure_count()
        );
        Ok(report)
    }

    /// Authenticate and pick the playback device
    async fn open_session(&self) -> Result<Session, FatalError> {
        info!("Trying to login...");
        self.remote
            .check_session()
            .await
            .map_err(FatalError::AuthenticationFailed)?;

        info!("Obtaining mobile device id...");
        let devices = self.remote.devices().await.map_err(FatalError::Remote)?;
        let device = devices.first().ok_or(FatalError::NoDevice)?;
        let device_id = device.stream_id().to_string();

        info!(
            "Using device_id: {} ({})",
            device_id,
            device.name.as_deref().unwrap_or("unnamed")
        );
        Ok(Session { device_id })
    }

    /// Fetch the requested playlist with library metadata filled in
    async fn fetch_playlist(&self) -> Result<PlaylistSnapshot, FatalError> {
        info!("Fetching user library...");
        let library = index_library(
            self.remote
                .library_tracks()
                .await
                .map_err(FatalError::Remote)?,
        );
        debug!("Library has {} tracks", library.len());

        info!("Fetching user playlists...");
        let playlists = self.remote.playlists().await.map_err(FatalError::Remote)?;

        let requested = &self.config.playlist;
        let available: Vec<String> = playlists.iter().map(|p| p.name.clone()).collect();
        let playlist = playlists
            .into_iter()
            .find(|p| &p.name == requested)
            .ok_or_else(|| FatalError::PlaylistNotFound {
                requested: requested.clone(),
                available,
            })?;

        Ok(playlist.with_library_metadata(&library))
    }

    /// Materialize tracks with bounded concurrency
    ///
    /// Returns the report and whether `shutdown` cut the phase short.
    async fn download_all(
        &self,
        materializer: &Materializer,
        tracks: Vec<TrackRecord>,
        shutdown: impl Future<Output = ()>,
    ) -> (DownloadReport, bool) {
        let multi = if self.config.show_progress {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let overall = multi.add(ProgressBar::new(tracks.len() as u64));
        overall.set_style(progress_style(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        ));

        let multi = &multi;
        let overall = &overall;
        let pending = stream::iter(tracks)
            .map(|track| async move {
                let bar = multi.insert_before(overall, ProgressBar::new(0));
                bar.set_style(progress_style(
                    "{msg:50} [{bar:30.cyan/blue}] {bytes}/{total_bytes} {bytes_per_sec}",
                ));
                bar.set_message(label(&track));

                let outcome = materializer.materialize(&track, &bar).await;
                bar.finish_and_clear();
                (track, outcome)
            })
            .buffer_unordered(self.config.effective_parallel());
        tokio::pin!(pending);
        tokio::pin!(shutdown);

        let mut report = DownloadReport::default();
        let interrupted = loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break true,
                next = pending.next() => match next {
                    Some((track, outcome)) => {
                        match &outcome {
                            Ok(done) => {
                                debug!("Downloaded {}", done.path.display());
                                overall.set_message(derive_filename(&track));
                            }
                            Err(e) => error!("Error downloading \"{}\": {}", track.id, e),
                        }
                        overall.inc(1);
                        report.record(track.id, outcome);
                    }
                    None => break false,
                },
            }
        };

        if interrupted {
            overall.abandon_with_message("Interrupted");
        } else {
            overall.finish_with_message("Downloads complete");
        }
        (report, interrupted)
    }

    fn print_plan(&self, plan: &ReconciliationResult) {
        println!("{}", "[DRY RUN] Would sync:".yellow());
        for path in plan.sorted_deletions() {
            println!("  Delete: {}", path.display());
        }
        for track in &plan.to_download {
            println!("  Download: {}", derive_filename(track));
        }
    }

    /// Print a status line when running interactively
    fn say(&self, line: impl std::fmt::Display) {
        if self.config.show_progress {
            println!("{}", line);
        } else {
            debug!("{}", line);
        }
    }
}

/// Progress bar label: the temporary filename, truncated
fn label(track: &TrackRecord) -> String {
    temp_filename(track).chars().take(LABEL_WIDTH).collect()
}

fn progress_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
