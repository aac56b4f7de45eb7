//! Removal of stale files

use std::path::PathBuf;

use colored::Colorize;
use tokio::fs;
use tracing::{debug, warn};

use super::report::DeletionReport;

/// Delete every path, one at a time, carrying on past individual failures
pub async fn delete_all(paths: Vec<PathBuf>, verbose_output: bool) -> DeletionReport {
    let mut report = DeletionReport::default();

    for path in paths {
        let outcome = fs::remove_file(&path).await;
        match &outcome {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                if verbose_output {
                    println!("{} {}", format!("Deleting {}", path.display()).yellow(), "Ok".green());
                }
            }
            Err(e) => {
                warn!("Failed to delete {}: {}", path.display(), e);
                if verbose_output {
                    println!(
                        "{} {}",
                        format!("Deleting {}", path.display()).yellow(),
                        e.to_string().red()
                    );
                }
            }
        }
        report.record(path, outcome);
    }

    report
}
