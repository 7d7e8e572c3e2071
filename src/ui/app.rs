/************** Operator panel ********************/

// egui status panel over the simulation store:
//  - job name and status badge
//  - tool-head position (smoothed)
//  - amperage / voltage / temperature
//  - start/stop and reset

use eframe::egui;
use tokio::time::Duration;

use crate::simulation::{SimulationControl, SimulationDriver};
use crate::store::RobotStatus;
use crate::ui::follower::ToolHeadFollower;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

fn status_color(status: RobotStatus) -> egui::Color32 {
    let [r, g, b] = status.color();
    egui::Color32::from_rgb(r, g, b)
}

pub struct AppUI {
    control: SimulationControl,
    follower: ToolHeadFollower,
    // keeps the driver task alive for the lifetime of the window
    _driver: SimulationDriver,
}

impl AppUI {
    /// Must be called from within a tokio runtime.
    pub fn new(cc: &eframe::CreationContext<'_>, driver: SimulationDriver) -> Self {
        let control = driver.control();

        // repaint on every store write
        let ctx = cc.egui_ctx.clone();
        let mut rx = control.store().subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                ctx.request_repaint();
            }
        });

        let follower = ToolHeadFollower::new(
            control.store().robot().position,
            crate::ui::follower::DEFAULT_SMOOTHING,
        );
        Self {
            control,
            follower,
            _driver: driver,
        }
    }
}

impl eframe::App for AppUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snap = self.control.store().snapshot();
        let robot = &snap.robot;
        let readout = robot.readout();
        let head = self.follower.step(robot.position);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.with_layout(
                egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                |ui| {
                    ui.heading("WAAM Robot Status");
                },
            );
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("CURRENT JOB");
                ui.monospace(&readout.job_name);
                ui.separator();
                ui.label(
                    egui::RichText::new(readout.status)
                        .strong()
                        .color(status_color(robot.status)),
                );
            });

            ui.separator();
            ui.label("POSITION");
            ui.horizontal(|ui| {
                for (axis, value) in ["X", "Y", "Z"].iter().zip(readout.position.iter()) {
                    ui.monospace(format!("{axis} {value}"));
                }
            });
            ui.label(format!(
                "tool head ({:.2}, {:.2}, {:.2}){}",
                head.x,
                head.y,
                head.z,
                if robot.status.is_active() { "  nozzle lit" } else { "" }
            ));

            ui.separator();
            egui::Grid::new("electrical").num_columns(3).show(ui, |ui| {
                ui.label("AMPERAGE");
                ui.label("VOLTAGE");
                ui.label("TEMPERATURE");
                ui.end_row();
                ui.monospace(&readout.amperage);
                ui.monospace(&readout.voltage);
                ui.monospace(&readout.temperature);
                ui.end_row();
            });

            ui.separator();
            ui.horizontal(|ui| {
                let label = if snap.simulation.is_running {
                    "Stop Simulation"
                } else {
                    "Start Simulation"
                };
                if ui.button(label).clicked() {
                    self.control.toggle_run();
                }
                if ui.button("Reset").clicked() {
                    self.control.reset();
                }
            });
        });

        // keep easing the head between telemetry writes
        if snap.simulation.is_running || self.follower.position() != robot.position {
            ctx.request_repaint_after(FRAME_INTERVAL);
        }
    }
}
