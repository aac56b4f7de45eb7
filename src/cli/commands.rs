//! CLI command handlers

use std::sync::Arc;

use colored::Colorize;
use tracing::warn;

use super::{Cli, Credentials};
use crate::error::FatalError;
use crate::subsonic::SubsonicClient;
use crate::sync::{HttpTransport, LoftyTagWriter, SyncEngine, SyncReport};

/// Exit code used when the run was interrupted
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Handle a sync run
pub async fn sync(cli: Cli) -> Result<SyncReport, FatalError> {
    let creds = Credentials::resolve(cli.server.clone(), cli.email.clone(), cli.password.clone())?;
    let config = cli.sync_config();

    let client = SubsonicClient::new(
        &creds.server,
        &creds.username,
        &creds.password,
        config.request_timeout,
    )
    .map_err(FatalError::Remote)?;
    let transport = HttpTransport::new(config.request_timeout).map_err(FatalError::Remote)?;

    println!("Syncing \"{}\" to {}", config.playlist.cyan(), config.destination.display());

    let engine = SyncEngine::new(
        Arc::new(client),
        Arc::new(transport),
        Arc::new(LoftyTagWriter),
        config,
    );

    engine.run_until(interrupted()).await
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => warn!("Interrupted, abandoning in-flight downloads"),
        Err(e) => {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Print the end-of-run summary
pub fn print_report(report: &SyncReport) {
    if report.dry_run {
        return;
    }

    println!();
    if report.interrupted {
        println!("{}", "Sync interrupted".yellow().bold());
    } else if report.has_failures() {
        println!("{}", "Sync finished with errors".yellow().bold());
    } else {
        println!("{}", "Sync complete!".green().bold());
    }
    println!("  Playlist: {} ({} tracks)", report.playlist, report.track_count);
    println!("  Already present: {}", report.satisfied);
    println!("  Deleted: {}", report.deletions.deleted.len());
    println!("  Downloaded: {}", report.downloads.downloaded.len());
    println!(
        "  Total size: {:.1} MB",
        report.downloads.bytes_downloaded as f64 / 1_048_576.0
    );

    if report.has_failures() {
        println!("  Failed: {}", report.failure_count().to_string().red());
        for (path, e) in &report.deletions.failed {
            eprintln!("{}", format!("    delete {}: {}", path.display(), e).red());
        }
        for (id, e) in &report.downloads.failed {
            eprintln!("{}", format!("    download \"{}\": {}", id, e).red());
        }
    }
}

/// Print a fatal error the way the user needs to see it
pub fn print_fatal(err: &FatalError) {
    eprintln!("{}", err.to_string().red());

    if let FatalError::PlaylistNotFound { available, .. } = err {
        println!();
        println!("{}", "Available playlists:".yellow());
        for name in available {
            println!("{}", name.yellow());
        }
    }
}
