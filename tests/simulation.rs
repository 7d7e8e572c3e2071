use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::time::{sleep, Duration};

use waam_telemetry::config::JOB_NAMES;
use waam_telemetry::{
    Position, RobotAction, RobotState, RobotStatus, SimulationConfig, SimulationControl,
    SimulationDriver, Snapshot, Store,
};

fn check_invariants(snap: &Snapshot) -> Result<(), String> {
    let r = &snap.robot;
    if snap.simulation.is_running && r.status == RobotStatus::Paused {
        return Err("running while paused".into());
    }
    if !snap.simulation.is_running && (r.amperage != 0.0 || r.voltage != 0.0) {
        return Err(format!("stopped with live arc: {}A {}V", r.amperage, r.voltage));
    }
    let p = r.position;
    if !(-2.0..=2.0).contains(&p.x) || !(1.0..=3.0).contains(&p.y) || !(-2.0..=2.0).contains(&p.z) {
        return Err(format!("position out of workspace: {p:?}"));
    }
    Ok(())
}

/// Spawns a subscriber asserting the invariants on every snapshot it observes.
fn watch_invariants(
    store: &Store,
) -> (tokio::task::JoinHandle<Result<(), String>>, Arc<AtomicUsize>) {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let mut rx = store.subscribe();
    let handle = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snap = rx.borrow_and_update().clone();
            counter.fetch_add(1, Ordering::Relaxed);
            check_invariants(&snap)?;
        }
        Ok::<(), String>(())
    });
    (handle, seen)
}

#[test]
fn initial_state() {
    let store = Store::new();
    let snap = store.snapshot();
    assert_eq!(snap.robot.position, Position::new(0.0, 2.0, 0.0));
    assert_eq!(snap.robot.status, RobotStatus::Idle);
    assert_eq!(snap.robot.temperature, 25.0);
    assert_eq!(snap.robot.amperage, 0.0);
    assert_eq!(snap.robot.voltage, 0.0);
    assert_eq!(snap.robot.job_name, "No active job");
    assert!(!snap.simulation.is_running);
}

#[tokio::test(start_paused = true)]
async fn invariants_hold_across_operator_sessions() {
    let cfg = SimulationConfig {
        // make the status stream busy so Error/Idle show up during the run
        status_period_ms: 200,
        status_change_probability: 0.5,
        job_change_probability: 0.25,
        ..SimulationConfig::default()
    };
    let driver = SimulationDriver::spawn(Store::new(), cfg).unwrap();
    let ctl = driver.control();
    let (checker, seen) = watch_invariants(driver.store());

    for round in 0..6u64 {
        ctl.toggle_run();
        sleep(Duration::from_millis(900 + round * 130)).await;
        ctl.toggle_run();
        check_invariants(&driver.store().snapshot()).unwrap();
        sleep(Duration::from_millis(400)).await;
        if round % 3 == 2 {
            ctl.reset();
        }
    }

    driver.shutdown().await.unwrap();
    checker.abort();
    assert!(seen.load(Ordering::Relaxed) > 50);
    match checker.await {
        Ok(res) => res.unwrap(),
        Err(e) => assert!(e.is_cancelled()),
    }
}

#[tokio::test(start_paused = true)]
async fn idle_toggle_starts_a_job() {
    let driver = SimulationDriver::spawn(Store::new(), SimulationConfig::default()).unwrap();
    let snap = driver.control().toggle_run();
    assert!(snap.simulation.is_running);
    assert_eq!(snap.robot.status, RobotStatus::Printing);
    assert!(JOB_NAMES.contains(&snap.robot.job_name.as_str()));
    driver.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn printing_toggle_pauses_and_drops_arc() {
    let cfg = SimulationConfig {
        status_change_probability: 0.0,
        job_change_probability: 0.0,
        ..SimulationConfig::default()
    };
    let driver = SimulationDriver::spawn(Store::new(), cfg).unwrap();
    let ctl = driver.control();
    ctl.toggle_run();
    sleep(Duration::from_millis(650)).await;
    assert_ne!(driver.store().robot().amperage, 0.0);

    let snap = ctl.toggle_run();
    assert!(!snap.simulation.is_running);
    assert_eq!(snap.robot.status, RobotStatus::Paused);
    assert_eq!(snap.robot.amperage, 0.0);
    assert_eq!(snap.robot.voltage, 0.0);
    driver.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn error_survives_stop() {
    let cfg = SimulationConfig {
        status_change_probability: 0.0,
        job_change_probability: 0.0,
        ..SimulationConfig::default()
    };
    let driver = SimulationDriver::spawn(Store::new(), cfg).unwrap();
    let ctl = driver.control();
    ctl.set_run(true);
    driver
        .store()
        .dispatch_robot(RobotAction::SetStatus(RobotStatus::Error));
    sleep(Duration::from_millis(300)).await;

    let snap = ctl.toggle_run();
    assert_eq!(snap.robot.status, RobotStatus::Error);
    assert!(!snap.simulation.is_running);
    driver.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn no_telemetry_after_stop() {
    let driver = SimulationDriver::spawn(Store::new(), SimulationConfig::default()).unwrap();
    let ctl = driver.control();
    ctl.toggle_run();
    sleep(Duration::from_secs(3)).await;
    let stopped = ctl.toggle_run();
    let mut rx = driver.store().subscribe();

    // well past every stream's period
    sleep(Duration::from_secs(8)).await;
    assert!(!rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().robot, stopped.robot);
    driver.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn double_reset_matches_single_reset() {
    let driver = SimulationDriver::spawn(Store::new(), SimulationConfig::default()).unwrap();
    let ctl = driver.control();
    ctl.toggle_run();
    sleep(Duration::from_millis(1_200)).await;

    let once = ctl.reset();
    let twice = ctl.reset();
    assert_eq!(once.robot, twice.robot);
    assert_eq!(once.simulation, twice.simulation);
    assert_eq!(twice.robot, RobotState::default());

    sleep(Duration::from_secs(2)).await;
    assert_eq!(driver.store().robot(), RobotState::default());
    driver.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn controls_on_a_bare_store_handle_reconcile() {
    let cfg = SimulationConfig::default();
    let store = Store::new();
    let driver = SimulationDriver::spawn(store.clone(), cfg.clone()).unwrap();
    let (checker, _) = watch_invariants(&store);

    // operator surface built from the shared store, independent of the driver handle
    let ctl = SimulationControl::new(store.clone(), &cfg);
    ctl.toggle_run();
    sleep(Duration::from_millis(700)).await;
    let running = store.snapshot();
    assert!(running.simulation.is_running);
    assert_ne!(running.robot.status, RobotStatus::Paused);
    assert_ne!(running.robot.job_name, "No active job");
    assert_ne!(running.robot.amperage, 0.0);

    ctl.toggle_run();
    sleep(Duration::from_millis(700)).await;
    let stopped = store.snapshot();
    assert!(!stopped.simulation.is_running);
    assert_eq!(stopped.robot.amperage, 0.0);
    assert_eq!(stopped.robot.voltage, 0.0);
    check_invariants(&stopped).unwrap();

    driver.shutdown().await.unwrap();
    checker.abort();
    match checker.await {
        Ok(res) => res.unwrap(),
        Err(e) => assert!(e.is_cancelled()),
    }
}
