use std::sync::Arc;

use tracing::info;

use crate::config::SimulationConfig;
use crate::simulation::policy::reconcile;
use crate::store::{SimulationAction, Snapshot, Store};

/// Operator controls: start/stop and reset.
///
/// Flag changes made here carry their status reconciliation in the same store
/// write, so no reader ever sees a running flag with a paused head or a stopped
/// run with a live arc.
#[derive(Clone)]
pub struct SimulationControl {
    store: Store,
    job_names: Arc<[String]>,
}

impl SimulationControl {
    pub fn new(store: Store, config: &SimulationConfig) -> Self {
        Self {
            store,
            job_names: config.job_names.clone().into(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn is_running(&self) -> bool {
        self.store.simulation().is_running
    }

    pub fn toggle_run(&self) -> Snapshot {
        self.apply(SimulationAction::Toggle)
    }

    pub fn set_run(&self, running: bool) -> Snapshot {
        self.apply(SimulationAction::SetRunning(running))
    }

    /// Stops the run and restores the robot defaults. Any tick still in flight is dropped.
    pub fn reset(&self) -> Snapshot {
        self.store.reset();
        info!("simulation reset");
        self.store.snapshot()
    }

    fn apply(&self, action: SimulationAction) -> Snapshot {
        let mut rng = rand::thread_rng();
        let changed = self.store.transition(action, |robot, next| {
            reconcile(robot, next.is_running, &self.job_names, &mut rng)
        });
        match changed {
            Some(snap) => {
                info!(
                    running = snap.simulation.is_running,
                    status = %snap.robot.status,
                    job = %snap.robot.job_name,
                    "run flag changed"
                );
                snap
            }
            None => self.store.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JOB_NAMES;
    use crate::store::{RobotAction, RobotStatus};

    fn control() -> SimulationControl {
        SimulationControl::new(Store::new(), &SimulationConfig::default())
    }

    #[test]
    fn idle_start_prints() {
        let ctl = control();
        let snap = ctl.toggle_run();
        assert!(snap.simulation.is_running);
        assert_eq!(snap.robot.status, RobotStatus::Printing);
        assert!(JOB_NAMES.contains(&snap.robot.job_name.as_str()));
    }

    #[test]
    fn printing_stop_pauses() {
        let ctl = control();
        ctl.toggle_run();
        ctl.store().dispatch_robot(RobotAction::SetAmperage(201.0));
        ctl.store().dispatch_robot(RobotAction::SetVoltage(21.2));
        let snap = ctl.toggle_run();
        assert!(!snap.simulation.is_running);
        assert_eq!(snap.robot.status, RobotStatus::Paused);
        assert_eq!(snap.robot.amperage, 0.0);
        assert_eq!(snap.robot.voltage, 0.0);

        let resumed = ctl.toggle_run();
        assert_eq!(resumed.robot.status, RobotStatus::Printing);
    }

    #[test]
    fn error_is_sticky() {
        let ctl = control();
        ctl.set_run(true);
        ctl.store().dispatch_robot(RobotAction::SetStatus(RobotStatus::Error));
        let stopped = ctl.toggle_run();
        assert_eq!(stopped.robot.status, RobotStatus::Error);
        assert!(!stopped.simulation.is_running);
        let started = ctl.toggle_run();
        assert_eq!(started.robot.status, RobotStatus::Error);
        assert!(started.simulation.is_running);
    }

    #[test]
    fn redundant_set_run_does_not_reconcile() {
        let ctl = control();
        ctl.set_run(true);
        let job = ctl.store().robot().job_name;
        let epoch = ctl.store().snapshot().epoch();
        let snap = ctl.set_run(true);
        assert_eq!(snap.robot.job_name, job);
        assert_eq!(snap.epoch(), epoch);
    }

    #[test]
    fn reset_restores_defaults() {
        let ctl = control();
        ctl.toggle_run();
        let snap = ctl.reset();
        assert!(!snap.simulation.is_running);
        assert_eq!(snap.robot, crate::store::RobotState::default());
        assert_eq!(ctl.reset().robot, snap.robot);
    }
}
