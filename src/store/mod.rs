pub mod types;
pub mod actions;
pub mod store;

pub use actions::{RobotAction, SimulationAction};
pub use store::{Snapshot, Store};
pub use types::{Position, Readout, RobotState, RobotStatus, RobotUpdate, SimulationState};
