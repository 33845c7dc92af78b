//! Transit simulator state machine.
//!
//! Replays a path one discrete step per tick. The simulator itself has no
//! timer; [`super::runner`] drives [`TransitSimulator::tick`] periodically.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, PathPolyline};

/// Error from simulator configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("stride must be at least 1")]
    ZeroStride,

    #[error("tick period must be greater than zero")]
    ZeroPeriod,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    /// No path loaded.
    #[default]
    Idle,
    /// Advancing along the path.
    Running,
    /// At the last point. Terminal until the next load.
    Arrived,
}

/// Observable simulator state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub status: SimulationStatus,
    pub current_index: usize,
    pub path_len: usize,
    /// Position at `current_index`; `None` when idle.
    pub position: Option<Coordinate>,
    /// Fraction of the path covered, 0.0 to 1.0.
    pub progress: f64,
}

impl SimulationSnapshot {
    /// Snapshot of a simulator with nothing loaded.
    pub fn idle() -> Self {
        Self {
            status: SimulationStatus::Idle,
            current_index: 0,
            path_len: 0,
            position: None,
            progress: 0.0,
        }
    }
}

/// Moves a simulated vehicle along a path.
#[derive(Debug, Clone)]
pub struct TransitSimulator {
    path: Option<PathPolyline>,
    current_index: usize,
    status: SimulationStatus,
    stride: NonZeroUsize,
}

impl TransitSimulator {
    pub fn new(stride: NonZeroUsize) -> Self {
        Self {
            path: None,
            current_index: 0,
            status: SimulationStatus::Idle,
            stride,
        }
    }

    /// Load a path and start from its first point.
    ///
    /// Replaces anything already loaded. A single-point path is already
    /// at its destination.
    pub fn load(&mut self, path: PathPolyline) {
        self.status = if path.len() == 1 {
            SimulationStatus::Arrived
        } else {
            SimulationStatus::Running
        };
        self.current_index = 0;
        self.path = Some(path);
    }

    /// Advance by one stride, clamped to the last index.
    ///
    /// Does nothing unless running.
    pub fn tick(&mut self) -> SimulationStatus {
        if self.status != SimulationStatus::Running {
            return self.status;
        }
        let Some(path) = &self.path else {
            self.status = SimulationStatus::Idle;
            return self.status;
        };

        let last = path.last_index();
        self.current_index = (self.current_index + self.stride.get()).min(last);
        if self.current_index == last {
            self.status = SimulationStatus::Arrived;
        }
        self.status
    }

    /// Return to idle and drop the path.
    pub fn stop(&mut self) {
        self.status = SimulationStatus::Idle;
        self.current_index = 0;
        self.path = None;
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    /// Current position, if a path is loaded.
    pub fn position(&self) -> Option<Coordinate> {
        self.path.as_ref().and_then(|p| p.get(self.current_index))
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        let Some(path) = &self.path else {
            return SimulationSnapshot::idle();
        };

        let progress = if path.last_index() == 0 {
            1.0
        } else {
            self.current_index as f64 / path.last_index() as f64
        };

        SimulationSnapshot {
            status: self.status,
            current_index: self.current_index,
            path_len: path.len(),
            position: path.get(self.current_index),
            progress,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn path(n: usize) -> PathPolyline {
        PathPolyline::new(
            (0..n)
                .map(|i| Coordinate::new(0.0, i as f64 * 0.001).unwrap())
                .collect(),
        )
        .unwrap()
    }

    proptest! {
        /// Index never decreases and moves by exactly one stride until clamped
        #[test]
        fn monotonic(n in 1usize..200, s in 1usize..20, ticks in 0usize..300) {
            let mut sim = TransitSimulator::new(NonZeroUsize::new(s).unwrap());
            sim.load(path(n));
            let last = n - 1;

            for _ in 0..ticks {
                let before = sim.current_index();
                sim.tick();
                let after = sim.current_index();
                prop_assert!(after >= before);
                prop_assert_eq!(after, (before + s).min(last));
            }
        }

        /// Arrives in exactly ceil((n - 1) / stride) ticks
        #[test]
        fn terminates(n in 1usize..200, s in 1usize..20) {
            let mut sim = TransitSimulator::new(NonZeroUsize::new(s).unwrap());
            sim.load(path(n));

            let expected = (n - 1).div_ceil(s);
            let mut ticks = 0;
            while sim.status() == SimulationStatus::Running {
                sim.tick();
                ticks += 1;
            }
            prop_assert_eq!(ticks, expected);
            prop_assert_eq!(sim.current_index(), n - 1);
        }
    }
}
