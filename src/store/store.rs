use std::sync::Arc;

use tokio::sync::watch;

use crate::store::actions::{RobotAction, SimulationAction};
use crate::store::types::{RobotState, SimulationState};

/// Consistent view of both slices at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub robot: RobotState,
    pub simulation: SimulationState,
    // bumped on every run-flag transition and on reset
    pub(crate) epoch: u64,
}

impl Snapshot {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn set_running(&mut self, next: SimulationState) {
        if next.is_running != self.simulation.is_running {
            self.epoch += 1;
        }
        self.simulation = next;
    }
}

/// Shared state store.
///
/// The store owns the robot and simulation slices. Every write goes through a named
/// action and publishes a fresh snapshot to all subscribers; readers only ever get
/// clones. Cloning a `Store` yields another handle to the same state.
#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<Snapshot>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Snapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    pub fn robot(&self) -> RobotState {
        self.select(|s| s.robot.clone())
    }

    pub fn simulation(&self) -> SimulationState {
        self.select(|s| s.simulation)
    }

    /// Runs `f` against the current snapshot without cloning it.
    pub fn select<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> T {
        f(&self.tx.borrow())
    }

    /// Receiver that is marked changed after every write.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    pub fn dispatch_robot(&self, action: RobotAction) {
        self.tx.send_modify(|s| s.robot = s.robot.reduce(action));
    }

    /// Flag-only write on the simulation slice.
    ///
    /// Crate-internal: a bare flip skips status reconciliation, so callers outside the
    /// crate start and stop runs through `SimulationControl`.
    pub(crate) fn dispatch_simulation(&self, action: SimulationAction) {
        self.tx.send_modify(|s| {
            let next = s.simulation.reduce(action);
            s.set_running(next);
        });
    }

    /// Stops the run and restores the robot slice to its defaults in one write.
    pub fn reset(&self) {
        self.tx.send_modify(|s| {
            s.robot = s.robot.reduce(RobotAction::Reset);
            s.simulation = s.simulation.reduce(SimulationAction::Reset);
            s.epoch += 1;
        });
    }

    /// Applies a run-flag change and its dependent robot writes in one write.
    ///
    /// `reconcile` only runs when the flag actually flips; returns the resulting
    /// snapshot in that case and `None` otherwise.
    pub(crate) fn transition(
        &self,
        action: SimulationAction,
        reconcile: impl FnOnce(&mut RobotState, SimulationState),
    ) -> Option<Snapshot> {
        let mut out = None;
        self.tx.send_if_modified(|s| {
            let next = s.simulation.reduce(action);
            if next == s.simulation {
                return false;
            }
            s.set_running(next);
            reconcile(&mut s.robot, next);
            out = Some(s.clone());
            true
        });
        out
    }

    /// Applies a simulation tick issued during run `epoch`.
    ///
    /// Returns `false` and publishes nothing if the run has since stopped, been reset
    /// or been restarted, or if the tick produced no action.
    pub(crate) fn apply_tick(
        &self,
        epoch: u64,
        tick: impl FnOnce(&RobotState) -> Option<RobotAction>,
    ) -> bool {
        self.tx.send_if_modified(|s| {
            if !s.simulation.is_running || s.epoch != epoch {
                return false;
            }
            match tick(&s.robot) {
                Some(action) => {
                    s.robot = s.robot.reduce(action);
                    true
                }
                None => false,
            }
        })
    }
}
