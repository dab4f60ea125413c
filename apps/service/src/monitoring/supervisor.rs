use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::fetcher::Fetcher;
use super::poller::PollTask;
use super::types::Target;
use crate::database::Recorder;

/// Owns the poll tasks: one per target, all sharing a fetcher and a recorder
pub struct MonitorSupervisor {
    fetcher: Arc<dyn Fetcher>,
    recorder: Arc<dyn Recorder>,
}

impl MonitorSupervisor {
    pub fn new(fetcher: Arc<dyn Fetcher>, recorder: Arc<dyn Recorder>) -> Self {
        Self { fetcher, recorder }
    }

    /// Spawn a poll task for a single target
    fn spawn_task(&self, tasks: &mut JoinSet<()>, target: Target, cancel: CancellationToken) {
        let task = PollTask::new(target, self.fetcher.clone(), self.recorder.clone());
        tasks.spawn(task.run(cancel));
    }

    /// Run one poll task per target until `cancel` fires.
    ///
    /// Every task starts immediately. Returns right away for an empty target
    /// list, otherwise once all tasks have stopped.
    pub async fn run(&self, targets: Vec<Target>, cancel: CancellationToken) {
        if targets.is_empty() {
            info!("No targets to monitor");
            return;
        }

        let mut tasks = JoinSet::new();
        for target in targets {
            self.spawn_task(&mut tasks, target, cancel.child_token());
        }
        info!("Monitoring {} URLs now", tasks.len());

        while let Some(joined) = tasks.join_next().await {
            // A panicking task only takes itself down
            if let Err(e) = joined {
                error!("Poll task ended abnormally: {}", e);
            }
        }

        info!("All poll tasks stopped");
    }

    /// Run until `shutdown` resolves (typically Ctrl-C), then stop every task
    pub async fn run_until<F>(&self, targets: Vec<Target>, shutdown: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();

        let watcher = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                shutdown.await;
                info!("Monitoring interrupted. Exiting...");
                cancel.cancel();
            }
        });

        self.run(targets, cancel).await;
        watcher.abort();
    }
}
