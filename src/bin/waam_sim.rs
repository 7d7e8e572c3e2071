/*************** Headless simulator *******************/

// runs the telemetry driver without a window and logs every snapshot change

use std::path::PathBuf;

use clap::Parser;
use tokio::time::{sleep, Duration};
use tracing::info;

use waam_telemetry::{init_tracing, SimulationConfig, SimulationDriver, Store};

#[derive(Debug, Parser)]
#[command(name = "waam-sim", about = "Headless WAAM telemetry simulator")]
struct Args {
    /// JSON simulation config; defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many seconds (runs until ctrl-c when omitted)
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Start the run immediately
    #[arg(long)]
    autostart: bool,
}

#[tokio::main()]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::from_json_path(path)?,
        None => SimulationConfig::default(),
    };

    let store = Store::new();
    let driver = SimulationDriver::spawn(store.clone(), config)?;
    let control = driver.control();

    let mut rx = store.subscribe();
    let logger = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snap = rx.borrow_and_update().clone();
            info!(running = snap.simulation.is_running, "{}", snap.robot.readout());
        }
    });

    if args.autostart {
        control.set_run(true);
    }

    match args.duration_secs {
        Some(secs) => sleep(Duration::from_secs(secs)).await,
        None => tokio::signal::ctrl_c().await?,
    }

    control.set_run(false);
    driver.shutdown().await?;
    logger.abort();
    Ok(())
}
