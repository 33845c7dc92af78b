//! Periodic tracking task.
//!
//! Owns a [`TransitSimulator`] inside a spawned task and ticks it on a
//! tokio interval. Observers read snapshots from a watch channel.

use std::num::NonZeroUsize;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::PathPolyline;

use super::state::{SimulationError, SimulationSnapshot, SimulationStatus, TransitSimulator};

/// Configuration for the tracking task.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    tick_period: Duration,
    stride: NonZeroUsize,
}

impl SimulationConfig {
    pub fn new(tick_period: Duration, stride: usize) -> Result<Self, SimulationError> {
        if tick_period.is_zero() {
            return Err(SimulationError::ZeroPeriod);
        }
        let stride = NonZeroUsize::new(stride).ok_or(SimulationError::ZeroStride)?;
        Ok(Self {
            tick_period,
            stride,
        })
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(100),
            stride: NonZeroUsize::MIN,
        }
    }
}

type TaskOutput = (TransitSimulator, watch::Sender<SimulationSnapshot>);

/// Handle to a running tracking task.
///
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub struct TrackingHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<TaskOutput>>,
    updates: watch::Receiver<SimulationSnapshot>,
}

/// Load `path` and start ticking it.
///
/// The first tick fires one period after the call.
pub fn spawn_tracking(path: PathPolyline, config: &SimulationConfig) -> TrackingHandle {
    let mut sim = TransitSimulator::new(config.stride);
    sim.load(path);

    let (tx, rx) = watch::channel(sim.snapshot());
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let period = config.tick_period;

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        interval.tick().await;

        while sim.status() == SimulationStatus::Running {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    sim.tick();
                    tx.send_replace(sim.snapshot());
                }
            }
        }

        debug!(
            status = ?sim.status(),
            index = sim.current_index(),
            "tracking task finished"
        );
        (sim, tx)
    });

    TrackingHandle {
        cancel,
        task: Some(task),
        updates: rx,
    }
}

impl TrackingHandle {
    /// Latest published snapshot.
    pub fn snapshot(&self) -> SimulationSnapshot {
        *self.updates.borrow()
    }

    /// A receiver that sees every future snapshot, including the final
    /// idle one published by [`TrackingHandle::stop`].
    pub fn subscribe(&self) -> watch::Receiver<SimulationSnapshot> {
        self.updates.clone()
    }

    /// Cancel the task and wait for it to exit.
    ///
    /// Returns the last snapshot before stopping. Once this resolves no
    /// further ticks run.
    pub async fn stop(mut self) -> SimulationSnapshot {
        self.cancel.cancel();

        let Some(task) = self.task.take() else {
            return self.snapshot();
        };

        match task.await {
            Ok((mut sim, tx)) => {
                let last = sim.snapshot();
                sim.stop();
                tx.send_replace(sim.snapshot());
                last
            }
            Err(e) => {
                warn!(error = %e, "tracking task failed");
                self.snapshot()
            }
        }
    }
}

impl Drop for TrackingHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// At most one tracking task per trip.
#[derive(Debug)]
pub struct Tracker {
    config: SimulationConfig,
    current: Option<TrackingHandle>,
}

impl Tracker {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    /// Start tracking `path`.
    ///
    /// A task still loaded is dropped, which cancels it without waiting.
    /// Call [`Tracker::take`] and [`TrackingHandle::stop`] first to wait for it.
    pub fn start(&mut self, path: PathPolyline) {
        self.current = Some(spawn_tracking(path, &self.config));
    }

    /// Detach the current task, leaving the tracker idle.
    pub fn take(&mut self) -> Option<TrackingHandle> {
        self.current.take()
    }

    /// Latest snapshot, or idle when nothing is loaded.
    pub fn snapshot(&self) -> SimulationSnapshot {
        self.current
            .as_ref()
            .map(TrackingHandle::snapshot)
            .unwrap_or_else(SimulationSnapshot::idle)
    }
}
