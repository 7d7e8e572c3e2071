pub mod streams;
pub mod policy;
pub mod control;
pub mod task;

pub use control::SimulationControl;
pub use policy::reconcile;
pub use task::{simulation_task, SimulationDriver};
