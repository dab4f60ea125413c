use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::fetcher::Fetcher;
use super::types::{Observation, Target};
use crate::database::Recorder;

/// How a single fetch-check-record cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CycleOutcome {
    Recorded,
    RecordFailed,
    FetchFailed,
    /// Cancelled before the fetch completed; nothing was recorded
    Cancelled,
}

/// Drives one target's fetch, match, record, sleep loop
pub struct PollTask {
    target: Target,
    fetcher: Arc<dyn Fetcher>,
    recorder: Arc<dyn Recorder>,
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(15) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

impl PollTask {
    pub fn new(target: Target, fetcher: Arc<dyn Fetcher>, recorder: Arc<dyn Recorder>) -> Self {
        Self { target, fetcher, recorder }
    }

    /// Fetch the target and build an observation; `None` if the fetch failed
    async fn observe(&self) -> Option<Observation> {
        let url = &self.target.url;
        debug!("Start time {} for url {}", chrono::Local::now(), url);

        match self.fetcher.fetch(url).await {
            Ok(page) => {
                debug!(
                    "Response received for {} with status {}, took {:.3} seconds",
                    url,
                    page.status_code,
                    page.elapsed.as_secs_f64()
                );
                debug!("Body: {}...", preview(&page.body));
                Some(Observation::new(&self.target, page.status_code, page.elapsed, page.body))
            }
            Err(e) => {
                warn!("Fetching {} failed, skipping this cycle: {:#}", url, e);
                None
            }
        }
    }

    /// Hand an observation to the recorder. Failures are already logged there.
    async fn record(&self, observation: &Observation) -> CycleOutcome {
        match self.recorder.record(observation).await {
            Ok(()) => CycleOutcome::Recorded,
            Err(_) => {
                debug!("Observation for {} was not stored", observation.url);
                CycleOutcome::RecordFailed
            }
        }
    }

    /// Run one fetch-check-record cycle without sleeping.
    ///
    /// `cancel` interrupts the fetch only; once an observation exists the
    /// write runs to completion.
    pub(crate) async fn poll_once(&self, cancel: &CancellationToken) -> CycleOutcome {
        let observation = tokio::select! {
            biased;
            _ = cancel.cancelled() => return CycleOutcome::Cancelled,
            observation = self.observe() => observation,
        };

        match observation {
            Some(observation) => self.record(&observation).await,
            None => CycleOutcome::FetchFailed,
        }
    }

    /// Loop until `cancel` fires.
    ///
    /// Cancellation is honoured while fetching and while sleeping. A write
    /// that already started is allowed to finish.
    pub async fn run(self, cancel: CancellationToken) {
        let url = self.target.url.clone();
        let interval = self.target.interval();
        info!("Monitoring {} every {} seconds", url, self.target.interval_seconds);

        loop {
            if self.poll_once(&cancel).await == CycleOutcome::Cancelled {
                break;
            }

            debug!("Sleeping now for {} for {} seconds", url, self.target.interval_seconds);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
            debug!("Woke up for {} after {} seconds", url, self.target.interval_seconds);
        }

        info!("Stopped monitoring {}", url);
    }
}
