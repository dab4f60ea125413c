//! Process-wide log setup shared by the workspace binaries.

mod subscriber;

pub use subscriber::{LoggerError, init};
pub use tracing_appender::non_blocking::WorkerGuard;
