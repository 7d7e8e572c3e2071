//! Telemetry simulation engine and shared state store for a WAAM operator dashboard.
//!
//! - [`store`]: robot and simulation slices, pure reducers, and the reactive [`Store`].
//! - [`simulation`]: the driver task running the five telemetry streams, plus the
//!   operator controls that reconcile status with the run flag.
//! - [`config`]: stream rates, noise bands and the job-name set.
//! - [`ui`]: presentation helpers; the egui panel is behind the `ui` feature.

pub mod config;
pub mod error;
pub mod simulation;
pub mod store;
pub mod ui;

pub use config::SimulationConfig;
pub use error::{Result, SimError};
pub use simulation::{SimulationControl, SimulationDriver};
pub use store::{
    Position, RobotAction, RobotState, RobotStatus, RobotUpdate, SimulationAction,
    SimulationState, Snapshot, Store,
};

/// Installs the fmt subscriber used by the binaries (`RUST_LOG`, default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
