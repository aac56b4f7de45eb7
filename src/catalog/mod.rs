//! Remote catalog model and the service contract the sync core relies on

pub mod models;
pub mod service;

pub use models::{Device, PlaylistSnapshot, TrackMetadata, TrackRecord};
pub use service::RemoteService;
