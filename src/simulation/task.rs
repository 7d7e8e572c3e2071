/*************** Simulation driver *******************/

// A single task owns all five telemetry streams and multiplexes their timers on
// one `select!` loop. Streams are armed only while the run flag is set and are
// torn down (timers dropped) as soon as the flag clears, the run is reset, or it
// is restarted under a new epoch.
//
// Every tick is written through `Store::apply_tick` tagged with the epoch the
// streams were armed under; the store drops it if that run is over, so a reset
// always wins over a late tick.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::simulation::control::SimulationControl;
use crate::simulation::streams::{
    sample_amperage, sample_temperature, sample_voltage, status_tick, step_position,
};
use crate::store::{RobotAction, RobotState, RobotUpdate, Snapshot, Store};

enum Disarm {
    Stopped,
    Shutdown,
}

fn stream_timer(period: Duration) -> Interval {
    // first tick one period after arming, not immediately
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

fn tick(
    store: &Store,
    epoch: u64,
    stream: &'static str,
    f: impl FnOnce(&RobotState) -> Option<RobotAction>,
) {
    if !store.apply_tick(epoch, f) {
        trace!(stream, epoch, "tick not applied");
    }
}

pub async fn simulation_task(
    store: Store,
    config: Arc<SimulationConfig>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut rx = store.subscribe();
    let mut rng = StdRng::from_entropy();
    info!("simulation driver started");

    loop {
        let (running, epoch) = {
            let s = rx.borrow_and_update();
            (s.simulation.is_running, s.epoch())
        };

        if !running {
            tokio::select! {
                _ = &mut shutdown => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            continue;
        }

        info!(epoch, "streams armed");
        match run_streams(&store, &config, &mut rx, &mut shutdown, &mut rng, epoch).await {
            Disarm::Stopped => info!(epoch, "streams stopped"),
            Disarm::Shutdown => break,
        }
    }

    info!("simulation driver stopped");
}

async fn run_streams(
    store: &Store,
    cfg: &SimulationConfig,
    rx: &mut watch::Receiver<Snapshot>,
    shutdown: &mut oneshot::Receiver<()>,
    rng: &mut StdRng,
    epoch: u64,
) -> Disarm {
    let mut position = stream_timer(cfg.position_period());
    let mut temperature = stream_timer(cfg.temperature_period());
    let mut amperage = stream_timer(cfg.amperage_period());
    let mut voltage = stream_timer(cfg.voltage_period());
    let mut status = stream_timer(cfg.status_period());

    loop {
        tokio::select! {
            _ = &mut *shutdown => return Disarm::Shutdown,

            changed = rx.changed() => {
                if changed.is_err() {
                    return Disarm::Shutdown;
                }
                let live = {
                    let s = rx.borrow_and_update();
                    s.simulation.is_running && s.epoch() == epoch
                };
                if !live {
                    return Disarm::Stopped;
                }
            }

            _ = position.tick() => tick(store, epoch, "position", |r| {
                Some(RobotAction::SetPosition(step_position(
                    r.position,
                    cfg.position_step,
                    &cfg.workspace,
                    rng,
                )))
            }),

            _ = temperature.tick() => tick(store, epoch, "temperature", |_| {
                Some(RobotAction::SetTemperature(sample_temperature(cfg, rng)))
            }),

            _ = amperage.tick() => tick(store, epoch, "amperage", |_| {
                Some(RobotAction::SetAmperage(sample_amperage(cfg, rng)))
            }),

            _ = voltage.tick() => tick(store, epoch, "voltage", |_| {
                Some(RobotAction::SetVoltage(sample_voltage(cfg, rng)))
            }),

            _ = status.tick() => tick(store, epoch, "status", |r| {
                let change = status_tick(r.status, cfg, rng);
                if change.is_empty() {
                    return None;
                }
                debug!(from = %r.status, to = ?change.status, job = ?change.job_name, "status stream");
                Some(RobotAction::Merge(RobotUpdate {
                    status: change.status,
                    job_name: change.job_name,
                    ..Default::default()
                }))
            }),
        }
    }
}

/// Handle to a running simulation driver.
///
/// Dropping the handle aborts the driver task; [`shutdown`](Self::shutdown) stops it
/// and waits for it to finish.
pub struct SimulationDriver {
    control: SimulationControl,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SimulationDriver {
    /// Validates `config` and spawns the driver on the current tokio runtime.
    pub fn spawn(store: Store, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let control = SimulationControl::new(store.clone(), &config);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(simulation_task(store, Arc::new(config), shutdown_rx));
        Ok(Self {
            control,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn control(&self) -> SimulationControl {
        self.control.clone()
    }

    pub fn store(&self) -> &Store {
        self.control.store()
    }

    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.await.map_err(|_| SimError::DriverStopped),
            None => Ok(()),
        }
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
