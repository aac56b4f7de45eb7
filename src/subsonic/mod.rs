//! Subsonic-compatible implementation of the remote service

pub mod auth;
pub mod client;
pub mod models;

pub use client::SubsonicClient;
