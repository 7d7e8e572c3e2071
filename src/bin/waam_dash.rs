/*************** Operator dashboard *******************/

// spawns the simulation driver on the tokio runtime and opens the status panel

use waam_telemetry::ui::AppUI;
use waam_telemetry::{init_tracing, SimulationConfig, SimulationDriver, Store};

#[tokio::main()]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = std::env::var_os("WAAM_SIM_CONFIG").map(std::path::PathBuf::from);
    let config = SimulationConfig::load_or_default(config_path.as_deref());

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "WAAM Dashboard",
        options,
        Box::new(move |cc| {
            let driver = SimulationDriver::spawn(Store::new(), config)?;
            Ok(Box::new(AppUI::new(cc, driver)))
        }),
    )?;
    Ok(())
}
