pub mod config;

pub use config::{Band, SimulationConfig, Workspace, JOB_NAMES};
