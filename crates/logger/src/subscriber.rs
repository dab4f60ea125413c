use std::{env::var, fs::OpenOptions, io, path::Path};

use thiserror::Error;
use tracing::{level_filters::LevelFilter, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    Layer, Registry, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError,
};

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to open log file {path}: {source}")]
    LogFile { path: String, source: io::Error },
    #[error("Global subscriber already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber: console output plus an append-only log file.
///
/// The returned guard flushes the file writer on drop and has to be held
/// until the process exits.
pub fn init(logfile: impl AsRef<Path>) -> Result<WorkerGuard, LoggerError> {
    initialize_tracing(logfile.as_ref(), LevelFilter::INFO)
}

fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder().with_default_directive(level.into()).from_env_lossy()
}

fn initialize_tracing(logfile: &Path, level: LevelFilter) -> Result<WorkerGuard, LoggerError> {
    let file = OpenOptions::new().create(true).append(true).open(logfile).map_err(|source| {
        LoggerError::LogFile { path: logfile.display().to_string(), source }
    })?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let log_format = var("RUST_LOG_FORMAT").unwrap_or_default();

    let console_layer: BoxedLayer = match log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().with_filter(env_filter(level)).boxed(),
        _ => tracing_subscriber::fmt::layer().compact().with_filter(env_filter(level)).boxed(),
    };

    let file_layer: BoxedLayer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(env_filter(level))
        .boxed();

    tracing_subscriber::registry().with(vec![console_layer, file_layer]).try_init()?;

    if !matches!(log_format.as_str(), "" | "json") {
        warn!("Unknown RUST_LOG_FORMAT '{log_format}', using the compact format");
    }

    Ok(guard)
}
