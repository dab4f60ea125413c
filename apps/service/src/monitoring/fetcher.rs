use anyhow::{Result, anyhow};
use std::time::{Duration, Instant};

/// A completed GET: status, decoded body, and time to the response head
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub status_code: u16,
    pub body: String,
    pub elapsed: Duration,
}

/// Transport used by poll tasks
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Issue a single GET with no retry
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// HTTP/HTTPS fetcher backed by a shared reqwest client
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// `timeout_seconds == 0` leaves requests without a deadline
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_seconds));
        }

        Ok(Self { client: builder.build()? })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        let elapsed = start.elapsed();
        let status_code = response.status().as_u16();

        // Non-UTF-8 bodies are decoded lossily, so this only fails on transport errors
        let body = response.text().await.map_err(|e| anyhow!("Failed to read body: {}", e))?;

        Ok(FetchedPage { status_code, body, elapsed })
    }
}
