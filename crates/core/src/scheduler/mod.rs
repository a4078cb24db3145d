//! Periodic task scheduler with cooperative shutdown.
//!
//! Every task runs on its own tokio interval and watches a shared shutdown
//! signal between runs. [`Scheduler::shutdown`] raises the signal and waits
//! for each task, so a run that is already in flight completes first.

use std::future::Future;
use std::time::Duration;

use log::{error, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

struct ScheduledTask {
    name: String,
    handle: JoinHandle<()>,
}

pub struct Scheduler {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<ScheduledTask>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            tasks: Vec::new(),
        }
    }

    /// Run `job` every `period`, starting immediately.
    ///
    /// A slow run delays the next tick instead of bunching missed ones.
    pub fn spawn_periodic<F, Fut>(&mut self, name: impl Into<String>, period: Duration, mut job: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let period = period.max(Duration::from_millis(1));
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            info!(
                "Scheduled task '{}' started ({}s interval)",
                task_name,
                period.as_secs()
            );
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => job().await,
                }
            }
            info!("Scheduled task '{}' stopped", task_name);
        });

        self.tasks.push(ScheduledTask { name, handle });
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Signal every task to stop and wait for all of them.
    pub async fn shutdown(self) {
        // Receivers also stop when the sender is dropped
        let _ = self.shutdown_tx.send(true);

        for task in self.tasks {
            if let Err(e) = task.handle.await {
                error!("Scheduled task '{}' ended abnormally: {}", task.name, e);
            }
        }
        info!("Scheduler stopped");
    }
}
