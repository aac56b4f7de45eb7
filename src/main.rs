//! gmusicsync - Mirror a remote playlist into a local directory

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod cli;
mod config;
mod error;
mod subsonic;
mod sync;
mod utils;

use cli::commands;
use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "gmusicsync=debug,reqwest=debug"
    } else {
        "gmusicsync=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match commands::sync(cli).await {
        Ok(report) => {
            commands::print_report(&report);
            if report.interrupted {
                ExitCode::from(commands::INTERRUPTED_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            commands::print_fatal(&e);
            ExitCode::from(e.exit_code())
        }
    }
}
