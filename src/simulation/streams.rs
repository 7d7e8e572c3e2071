//! Per-tick sample generators for the five telemetry streams.
//!
//! Each function is one tick's worth of work: pure apart from the RNG it is handed,
//! so the driver decides when and against which snapshot it runs.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{Band, SimulationConfig, Workspace};
use crate::store::types::{Position, RobotStatus, DEFAULT_JOB_NAME};

/// Statuses the status stream may move to. Paused is only reachable by stopping the run.
const STREAM_STATUSES: [RobotStatus; 3] =
    [RobotStatus::Idle, RobotStatus::Printing, RobotStatus::Error];

/// Bounded random walk: perturb every axis, then clamp into the workspace.
pub fn step_position<R: Rng + ?Sized>(
    current: Position,
    step: f64,
    workspace: &Workspace,
    rng: &mut R,
) -> Position {
    let mut jitter = || (rng.gen::<f64>() - 0.5) * step;
    let x = current.x + jitter();
    let y = current.y + jitter();
    let z = current.z + jitter();
    Position {
        x: x.clamp(workspace.x[0], workspace.x[1]),
        y: y.clamp(workspace.y[0], workspace.y[1]),
        z: z.clamp(workspace.z[0], workspace.z[1]),
    }
}

/// Stationary noise around `band.base`, no memory of earlier samples.
pub fn sample_band<R: Rng + ?Sized>(band: &Band, rng: &mut R) -> f64 {
    band.base + (rng.gen::<f64>() - 0.5) * band.span
}

pub fn sample_temperature<R: Rng + ?Sized>(cfg: &SimulationConfig, rng: &mut R) -> f64 {
    sample_band(&cfg.temperature, rng).round()
}

pub fn sample_amperage<R: Rng + ?Sized>(cfg: &SimulationConfig, rng: &mut R) -> f64 {
    sample_band(&cfg.amperage, rng).round()
}

pub fn sample_voltage<R: Rng + ?Sized>(cfg: &SimulationConfig, rng: &mut R) -> f64 {
    (sample_band(&cfg.voltage, rng) * 10.0).round() / 10.0
}

pub fn draw_job_name<R: Rng + ?Sized>(job_names: &[String], rng: &mut R) -> String {
    job_names
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| DEFAULT_JOB_NAME.to_string())
}

/// Outcome of one status/job tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusTick {
    pub status: Option<RobotStatus>,
    pub job_name: Option<String>,
}

impl StatusTick {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.job_name.is_none()
    }
}

/// One draw decides both changes; the job redraw is not exclusive with the status change.
pub fn status_tick<R: Rng + ?Sized>(
    current: RobotStatus,
    cfg: &SimulationConfig,
    rng: &mut R,
) -> StatusTick {
    let roll = rng.gen::<f64>();
    let mut out = StatusTick::default();
    if roll < cfg.status_change_probability {
        let candidates: Vec<RobotStatus> = STREAM_STATUSES
            .iter()
            .copied()
            .filter(|s| *s != current)
            .collect();
        out.status = candidates.choose(rng).copied();
    }
    if roll < cfg.job_change_probability {
        out.job_name = Some(draw_job_name(&cfg.job_names, rng));
    }
    out
}
