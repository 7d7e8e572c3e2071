use rand::Rng;

use crate::simulation::streams::draw_job_name;
use crate::store::types::{RobotState, RobotStatus};

/// Adjusts the robot slice for a run-flag transition to `running`.
///
/// Starting moves Idle or Paused to Printing with a fresh job; stopping pauses a
/// printing head and drops the arc (0 A, 0 V). Error survives both directions.
pub fn reconcile<R: Rng + ?Sized>(
    robot: &mut RobotState,
    running: bool,
    job_names: &[String],
    rng: &mut R,
) {
    if running {
        match robot.status {
            RobotStatus::Idle | RobotStatus::Paused => {
                robot.status = RobotStatus::Printing;
                robot.job_name = draw_job_name(job_names, rng);
            }
            RobotStatus::Printing | RobotStatus::Error => {}
        }
    } else {
        if robot.status == RobotStatus::Printing {
            robot.status = RobotStatus::Paused;
        }
        robot.amperage = 0.0;
        robot.voltage = 0.0;
    }
}
