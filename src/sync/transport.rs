//! Byte transport for track audio and cover art

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::Client;

/// An open response body delivered in chunks
pub struct ByteStream {
    /// Expected total length when the server announced one
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, Result<Bytes>>,
}

/// A small resource fetched in one piece
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches bytes from URLs handed out by the remote service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a streaming download; non-success statuses are errors
    async fn open_stream(&self, url: &str) -> Result<ByteStream>;

    /// Fetch a whole resource; the status is reported, not turned into an error
    async fn fetch(&self, url: &str) -> Result<Fetched>;
}

/// `reqwest`-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("gmusicsync/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open_stream(&self, url: &str) -> Result<ByteStream> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .context("Failed to start download")?
            .error_for_status()
            .context("Download rejected by server")?;

        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.context("Failed to read download response"))
            .boxed();

        Ok(ByteStream {
            content_length,
            body,
        })
    }

    async fn fetch(&self, url: &str) -> Result<Fetched> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .context("Failed to fetch resource")?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = if response.status().is_success() {
            response.bytes().await.context("Failed to read response body")?
        } else {
            Bytes::new()
        };

        Ok(Fetched {
            status,
            content_type,
            body,
        })
    }
}
