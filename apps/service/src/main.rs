#![warn(clippy::all)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use webmonitor_service::config::Config;
use webmonitor_service::database::{PgRecorder, Recorder};
use webmonitor_service::monitoring::validation::validate_targets;
use webmonitor_service::monitoring::{HttpFetcher, MonitorSupervisor};
use webmonitor_service::{pool, targets};

#[derive(Parser, Debug)]
#[command(author, version, about = "Web Monitoring Service", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Path to the CSV file containing URLs, interval, and regex pattern
    #[arg(short, long)]
    urls: PathBuf,

    /// Path to the logfile
    #[arg(short, long, default_value = "webmonitor.log")]
    logfile: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = logger::init(&args.logfile)?;

    run(args).await.inspect_err(|e| error!("{:#}", e))
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(&args.config).context("Unusable configuration")?;
    debug!("{}", config);
    let dbname = config.database.dbname.clone();

    let pool = pool::connect_pool(&config.database).await?;
    info!("Connected to the {} database.", dbname);

    let recorder = Arc::new(PgRecorder::new(pool, config.table_name()?));
    recorder.ensure_schema().await?;
    info!("Ensured that the {} table exists in {} database.", recorder.table(), dbname);

    let rows = targets::read_targets(&args.urls)?;
    info!("URLs file \"{}\" read successfully.", args.urls.display());

    let targets = validate_targets(&rows, config.interval_bounds());
    debug!(
        "Validated URLs: {:?}",
        targets.iter().map(|t| (&t.url, t.interval_seconds)).collect::<Vec<_>>()
    );

    if targets.is_empty() {
        info!("There are no valid URLs to check, exiting...");
        return Ok(());
    }

    let fetcher = Arc::new(HttpFetcher::new(config.monitor.request_timeout_seconds)?);
    let supervisor = MonitorSupervisor::new(fetcher, recorder);
    supervisor.run_until(targets, shutdown_signal()).await;

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
