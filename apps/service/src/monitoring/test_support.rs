//! Test doubles for the fetch and record seams
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::fetcher::{FetchedPage, Fetcher};
use super::types::Observation;
use crate::database::Recorder;

/// Answers every GET with the same canned page, or fails if `page` is `None`
pub struct MockFetcher {
    page: Option<FetchedPage>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn ok(status_code: u16, body: &str) -> Self {
        Self {
            page: Some(FetchedPage {
                status_code,
                body: body.to_string(),
                elapsed: Duration::from_millis(120),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self { page: None, calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        self.calls.lock().unwrap().push(url.to_string());
        self.page.clone().ok_or_else(|| anyhow!("connection refused"))
    }
}

/// Never answers; used to check cancellation of an in-flight fetch
pub struct StalledFetcher;

#[async_trait]
impl Fetcher for StalledFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedPage> {
        std::future::pending().await
    }
}

/// Keeps every observation in memory
#[derive(Default)]
pub struct MemoryRecorder {
    observations: Mutex<Vec<Observation>>,
}

impl MemoryRecorder {
    pub fn observations(&self) -> Vec<Observation> {
        self.observations.lock().unwrap().clone()
    }
}

#[async_trait]
impl Recorder for MemoryRecorder {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn record(&self, observation: &Observation) -> Result<()> {
        self.observations.lock().unwrap().push(observation.clone());
        Ok(())
    }
}

/// Rejects every write, counting attempts
#[derive(Default)]
pub struct FailingRecorder {
    attempts: AtomicUsize,
}

impl FailingRecorder {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Recorder for FailingRecorder {
    async fn ensure_schema(&self) -> Result<()> {
        Err(anyhow!("storage unavailable"))
    }

    async fn record(&self, _observation: &Observation) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("storage unavailable"))
    }
}
