use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_JOB_NAME: &str = "No active job";
pub const AMBIENT_TEMPERATURE_C: f64 = 25.0;

/// Tool-head location in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Rest point above the build plate.
    pub const fn rest() -> Self {
        Self::new(0.0, 2.0, 0.0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::rest()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotStatus {
    Idle,
    Printing,
    Paused,
    Error,
}

impl RobotStatus {
    pub const ALL: [RobotStatus; 4] = [
        RobotStatus::Idle,
        RobotStatus::Printing,
        RobotStatus::Paused,
        RobotStatus::Error,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RobotStatus::Idle => "Idle",
            RobotStatus::Printing => "Printing",
            RobotStatus::Paused => "Paused",
            RobotStatus::Error => "Error",
        }
    }

    /// Badge / tool-head color as RGB.
    pub fn color(self) -> [u8; 3] {
        match self {
            RobotStatus::Idle => [0x22, 0xc5, 0x5e],
            RobotStatus::Printing => [0x3b, 0x82, 0xf6],
            RobotStatus::Paused => [0xea, 0xb3, 0x08],
            RobotStatus::Error => [0xef, 0x44, 0x44],
        }
    }

    /// Only a printing head is depositing (nozzle light on).
    pub fn is_active(self) -> bool {
        self == RobotStatus::Printing
    }
}

impl fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Robot slice of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    pub position: Position,
    pub status: RobotStatus,
    pub temperature: f64, // °C
    pub amperage: f64,    // A
    pub voltage: f64,     // V
    pub job_name: String,
}

impl Default for RobotState {
    fn default() -> Self {
        Self {
            position: Position::rest(),
            status: RobotStatus::Idle,
            temperature: AMBIENT_TEMPERATURE_C,
            amperage: 0.0,
            voltage: 0.0,
            job_name: DEFAULT_JOB_NAME.to_string(),
        }
    }
}

impl RobotState {
    /// Panel readout of the current telemetry.
    pub fn readout(&self) -> Readout {
        Readout {
            job_name: self.job_name.clone(),
            status: self.status.label(),
            position: [
                format!("{:.2}", self.position.x),
                format!("{:.2}", self.position.y),
                format!("{:.2}", self.position.z),
            ],
            amperage: format!("{}A", self.amperage),
            voltage: format!("{}V", self.voltage),
            temperature: format!("{}°C", self.temperature),
        }
    }
}

/// Display strings for the status panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    pub job_name: String,
    pub status: &'static str,
    pub position: [String; 3],
    pub amperage: String,
    pub voltage: String,
    pub temperature: String,
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | X {} Y {} Z {} | {} {} {}",
            self.status,
            self.job_name,
            self.position[0],
            self.position[1],
            self.position[2],
            self.amperage,
            self.voltage,
            self.temperature
        )
    }
}

/// Shallow partial update of the robot slice; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotUpdate {
    pub position: Option<Position>,
    pub status: Option<RobotStatus>,
    pub temperature: Option<f64>,
    pub amperage: Option<f64>,
    pub voltage: Option<f64>,
    pub job_name: Option<String>,
}

/// Simulation slice of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    pub is_running: bool,
}
