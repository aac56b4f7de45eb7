//! Playlist-to-directory reconciliation and materialization

pub mod delete;
pub mod engine;
pub mod filename;
pub mod materializer;
pub mod reconcile;
pub mod report;
pub mod scanner;
pub mod tagging;
pub mod transport;

pub use engine::SyncEngine;
pub use report::SyncReport;
pub use tagging::LoftyTagWriter;
pub use transport::HttpTransport;
