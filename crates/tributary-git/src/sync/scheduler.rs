//! Per-repository poll scheduler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, warn};

use super::PollReport;
use crate::error::SyncError;

/// Something the scheduler can synchronize.
///
/// The scheduler owns its target outright, so `sync` never runs twice at once.
#[async_trait]
pub trait SyncTarget: Send + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Synchronizes the target once.
    async fn sync(&mut self) -> Result<PollReport, SyncError>;
}

/// Handle for controlling a running scheduler.
///
/// Dropping the handle stops the scheduler.
#[derive(Debug)]
pub struct SchedulerHandle {
    /// Sender to signal shutdown.
    shutdown_tx: watch::Sender<bool>,
    /// Wakes the scheduler for an out-of-band sync.
    trigger: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Signals the scheduler to stop after the sync in flight, if any.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Requests a sync outside the regular schedule.
    ///
    /// Requests made while a sync is running are coalesced into one.
    pub fn trigger(&self) {
        self.trigger.notify_one();
    }

    /// Returns true once the scheduler loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Stops the scheduler and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!("Scheduler task ended abnormally: {}", e);
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drives one [`SyncTarget`] on a fixed interval.
pub struct PollScheduler<T> {
    target: T,
    /// `None` disables polling.
    interval: Option<Duration>,
    trigger: Arc<Notify>,
}

impl<T: SyncTarget> PollScheduler<T> {
    /// Creates a scheduler. An `interval` of `None` disables polling.
    pub fn new(target: T, interval: Option<Duration>) -> Self {
        Self {
            target,
            interval,
            trigger: Arc::new(Notify::new()),
        }
    }

    /// Starts the scheduler on the current tokio runtime.
    ///
    /// Returns a handle that can be used to trigger or stop it.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let trigger = Arc::clone(&self.trigger);

        let task = tokio::spawn(self.run(shutdown_rx));

        SchedulerHandle {
            shutdown_tx,
            trigger,
            task: Some(task),
        }
    }

    /// Runs the scheduler loop until shutdown is signalled.
    ///
    /// Syncs once immediately, then on every tick. Errors are logged and
    /// never end the loop.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        let Some(period) = self.interval else {
            info!(
                "Polling disabled for repository {}, not scheduling",
                self.target.name()
            );
            return;
        };

        if *shutdown_rx.borrow() {
            return;
        }

        info!(
            "Starting poll scheduler for repository {} with interval {:?}",
            self.target.name(),
            period
        );

        self.do_sync().await;

        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let trigger = Arc::clone(&self.trigger);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.do_sync().await;
                }
                _ = trigger.notified() => {
                    debug!("Sync triggered for repository {}", self.target.name());
                    self.do_sync().await;
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        info!("Poll scheduler for repository {} shutting down", self.target.name());
                        break;
                    }
                }
            }
        }
    }

    /// Performs a single sync, logging the outcome.
    async fn do_sync(&mut self) {
        match self.target.sync().await {
            Ok(report) if report.is_clean() => {
                debug!(
                    "Sync of repository {} complete ({})",
                    self.target.name(),
                    report.outcome()
                );
            },
            Ok(report) => {
                warn!(
                    "Sync of repository {} finished with {} failed branch(es)",
                    self.target.name(),
                    report.failures().len()
                );
            },
            Err(e) if e.is_transient() => {
                warn!("Sync of repository {} failed: {}", self.target.name(), e);
            },
            Err(e) => {
                error!("Sync of repository {} failed: {}", self.target.name(), e);
            },
        }
    }
}
