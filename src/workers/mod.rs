pub mod aggregation;
pub mod detection;

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// The two periodic schedules every tracking session owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerName {
    Detection,
    Aggregation,
}

impl WorkerName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Detection => "detection",
            Self::Aggregation => "aggregation",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkerError {
    #[error("{} schedule is already running", .0.as_str())]
    AlreadyRunning(WorkerName),
}

struct ScheduleHandle {
    shutdown_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

/// Holds exactly one cancellable handle per schedule.
///
/// A tick body is awaited before the next tick is taken, so ticks of one
/// schedule never overlap. Missed ticks are delayed rather than replayed.
#[derive(Default)]
pub struct Scheduler {
    handles: HashMap<WorkerName, ScheduleHandle>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self, name: WorkerName) -> bool {
        self.handles
            .get(&name)
            .is_some_and(|h| !h.join.is_finished())
    }

    /// Start a schedule whose first tick fires one `period` from now.
    pub fn start<F, Fut>(
        &mut self,
        name: WorkerName,
        period: Duration,
        tick: F,
    ) -> Result<(), WorkerError>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.is_running(name) {
            tracing::warn!(worker = name.as_str(), "Rejected duplicate schedule start");
            return Err(WorkerError::AlreadyRunning(name));
        }

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let join = spawn_periodic(name, period, shutdown_rx, tick);
        self.handles.insert(name, ScheduleHandle { shutdown_tx, join });

        tracing::debug!(
            worker = name.as_str(),
            period_ms = period.as_millis() as u64,
            "Schedule started"
        );
        Ok(())
    }

    /// Cancel future ticks and wait for a tick in flight to finish.
    /// Returns `false` when the schedule was not registered.
    pub async fn stop(&mut self, name: WorkerName) -> bool {
        let Some(handle) = self.handles.remove(&name) else {
            return false;
        };

        let _ = handle.shutdown_tx.send(());
        if let Err(e) = handle.join.await {
            tracing::error!(worker = name.as_str(), error = %e, "Schedule task panicked");
        }
        true
    }

    pub async fn stop_all(&mut self) {
        let names: Vec<WorkerName> = self.handles.keys().copied().collect();
        for name in names {
            self.stop(name).await;
        }
    }
}

fn spawn_periodic<F, Fut>(
    name: WorkerName,
    period: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
    mut tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                _ = interval.tick() => tick().await,
            }
        }

        tracing::debug!(worker = name.as_str(), "Schedule stopped");
    })
}
