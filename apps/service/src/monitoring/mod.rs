/// Polling engine
///
/// This module is responsible for:
/// - Validating target rows
/// - Fetching targets and measuring response time
/// - Running one independent poll loop per target
/// - Handing observations to the recorder
pub mod fetcher;
pub mod poller;
pub mod supervisor;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use fetcher::{Fetcher, HttpFetcher};
pub use supervisor::MonitorSupervisor;
pub use types::{Observation, Target};
