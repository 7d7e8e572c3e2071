use crate::store::types::{Position, RobotState, RobotStatus, RobotUpdate, SimulationState};

/// Write operations on the robot slice.
#[derive(Debug, Clone, PartialEq)]
pub enum RobotAction {
    SetPosition(Position),
    SetStatus(RobotStatus),
    SetTemperature(f64),
    SetAmperage(f64),
    SetVoltage(f64),
    SetJobName(String),
    Merge(RobotUpdate),
    Reset,
}

/// Write operations on the simulation slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationAction {
    Toggle,
    SetRunning(bool),
    Reset,
}

impl RobotState {
    /// Pure transition: returns the slice after `action`.
    pub fn reduce(&self, action: RobotAction) -> RobotState {
        let mut next = self.clone();
        match action {
            RobotAction::SetPosition(p) => next.position = p,
            RobotAction::SetStatus(s) => next.status = s,
            RobotAction::SetTemperature(t) => next.temperature = t,
            RobotAction::SetAmperage(a) => next.amperage = a,
            RobotAction::SetVoltage(v) => next.voltage = v,
            RobotAction::SetJobName(name) => next.job_name = name,
            RobotAction::Merge(update) => next.merge(update),
            RobotAction::Reset => next = RobotState::default(),
        }
        next
    }

    fn merge(&mut self, update: RobotUpdate) {
        let RobotUpdate {
            position,
            status,
            temperature,
            amperage,
            voltage,
            job_name,
        } = update;
        if let Some(p) = position {
            self.position = p;
        }
        if let Some(s) = status {
            self.status = s;
        }
        if let Some(t) = temperature {
            self.temperature = t;
        }
        if let Some(a) = amperage {
            self.amperage = a;
        }
        if let Some(v) = voltage {
            self.voltage = v;
        }
        if let Some(name) = job_name {
            self.job_name = name;
        }
    }
}

impl SimulationState {
    pub fn reduce(self, action: SimulationAction) -> SimulationState {
        match action {
            SimulationAction::Toggle => SimulationState {
                is_running: !self.is_running,
            },
            SimulationAction::SetRunning(is_running) => SimulationState { is_running },
            SimulationAction::Reset => SimulationState { is_running: false },
        }
    }
}
