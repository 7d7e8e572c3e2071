use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SimError};

// Stream periods (ms)
pub const POSITION_PERIOD_MS: u64 = 50;
pub const TEMPERATURE_PERIOD_MS: u64 = 500;
pub const AMPERAGE_PERIOD_MS: u64 = 300;
pub const VOLTAGE_PERIOD_MS: u64 = 300;
pub const STATUS_PERIOD_MS: u64 = 2000;

// Per-axis random-walk step: offset drawn from [-STEP/2, STEP/2)
pub const POSITION_STEP: f64 = 0.1;

// Typical WAAM process window
pub const TEMPERATURE_BASE_C: f64 = 200.0;
pub const TEMPERATURE_SPAN_C: f64 = 40.0;
pub const AMPERAGE_BASE_A: f64 = 200.0;
pub const AMPERAGE_SPAN_A: f64 = 50.0;
pub const VOLTAGE_BASE_V: f64 = 21.0;
pub const VOLTAGE_SPAN_V: f64 = 3.0;

pub const STATUS_CHANGE_PROBABILITY: f64 = 0.1;
pub const JOB_CHANGE_PROBABILITY: f64 = 0.05;

pub const JOB_NAMES: [&str; 6] = [
    "WAAM Layer 1",
    "WAAM Layer 2",
    "WAAM Layer 3",
    "Calibration Routine",
    "Surface Scan",
    "Quality Check",
];

/// Inclusive bounds of the tool-head work envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub z: [f64; 2],
}

impl Default for Workspace {
    fn default() -> Self {
        // y stays above the build plate
        Self {
            x: [-2.0, 2.0],
            y: [1.0, 3.0],
            z: [-2.0, 2.0],
        }
    }
}

/// Stationary noise band: samples are drawn from `base ± span / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub base: f64,
    pub span: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub position_period_ms: u64,
    pub temperature_period_ms: u64,
    pub amperage_period_ms: u64,
    pub voltage_period_ms: u64,
    pub status_period_ms: u64,
    pub position_step: f64,
    pub workspace: Workspace,
    pub temperature: Band,
    pub amperage: Band,
    pub voltage: Band,
    pub status_change_probability: f64,
    pub job_change_probability: f64,
    pub job_names: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            position_period_ms: POSITION_PERIOD_MS,
            temperature_period_ms: TEMPERATURE_PERIOD_MS,
            amperage_period_ms: AMPERAGE_PERIOD_MS,
            voltage_period_ms: VOLTAGE_PERIOD_MS,
            status_period_ms: STATUS_PERIOD_MS,
            position_step: POSITION_STEP,
            workspace: Workspace::default(),
            temperature: Band { base: TEMPERATURE_BASE_C, span: TEMPERATURE_SPAN_C },
            amperage: Band { base: AMPERAGE_BASE_A, span: AMPERAGE_SPAN_A },
            voltage: Band { base: VOLTAGE_BASE_V, span: VOLTAGE_SPAN_V },
            status_change_probability: STATUS_CHANGE_PROBABILITY,
            job_change_probability: JOB_CHANGE_PROBABILITY,
            job_names: JOB_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SimulationConfig {
    /// Loads a JSON config; missing fields take their defaults.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: SimulationConfig =
            serde_json::from_str(&raw).map_err(|source| SimError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Like [`from_json_path`](Self::from_json_path) but falls back to defaults on any error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::from_json_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, "using default simulation config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("position_period_ms", self.position_period_ms),
            ("temperature_period_ms", self.temperature_period_ms),
            ("amperage_period_ms", self.amperage_period_ms),
            ("voltage_period_ms", self.voltage_period_ms),
            ("status_period_ms", self.status_period_ms),
        ];
        for (name, ms) in periods {
            if ms == 0 {
                return Err(SimError::InvalidConfig(format!("{name} must be > 0")));
            }
        }
        for (name, p) in [
            ("status_change_probability", self.status_change_probability),
            ("job_change_probability", self.job_change_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::InvalidConfig(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        if !(self.position_step >= 0.0) {
            return Err(SimError::InvalidConfig("position_step must be >= 0".into()));
        }
        for (name, band) in [
            ("temperature", self.temperature),
            ("amperage", self.amperage),
            ("voltage", self.voltage),
        ] {
            if !(band.span >= 0.0) || !band.base.is_finite() {
                return Err(SimError::InvalidConfig(format!("{name} band is malformed")));
            }
        }
        let ws = self.workspace;
        for (axis, [lo, hi]) in [("x", ws.x), ("y", ws.y), ("z", ws.z)] {
            if !(lo <= hi) {
                return Err(SimError::InvalidConfig(format!(
                    "workspace {axis} bounds inverted: [{lo}, {hi}]"
                )));
            }
        }
        if self.job_names.is_empty() {
            return Err(SimError::InvalidConfig("job_names must not be empty".into()));
        }
        Ok(())
    }

    pub fn position_period(&self) -> Duration {
        Duration::from_millis(self.position_period_ms)
    }

    pub fn temperature_period(&self) -> Duration {
        Duration::from_millis(self.temperature_period_ms)
    }

    pub fn amperage_period(&self) -> Duration {
        Duration::from_millis(self.amperage_period_ms)
    }

    pub fn voltage_period(&self) -> Duration {
        Duration::from_millis(self.voltage_period_ms)
    }

    pub fn status_period(&self) -> Duration {
        Duration::from_millis(self.status_period_ms)
    }
}
