//! Engine binary for the store simulation.
//!
//! Wires the store, the dispatcher, the accident generator, the stats
//! publisher and the observer server together, then runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `storesim-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the store with the standard layout
//! 4. Start the dispatcher (fan-out or pool)
//! 5. Admit the initial population
//! 6. Create the accident controller, starting it if configured
//! 7. Start the stats publisher and the observer server
//! 8. Wait for `Ctrl-C`, then shut down

mod error;

use std::path::Path;
use std::sync::Arc;

use storesim_core::Store;
use storesim_core::accident::AccidentController;
use storesim_core::config::{LoggingConfig, SimulationConfig};
use storesim_core::dispatcher::spawn_dispatcher;
use storesim_core::population;
use storesim_observer::publisher::spawn_stats_publisher;
use storesim_observer::startup::spawn_observer;
use storesim_observer::{AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "storesim-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run().await?;
    Ok(())
}

/// Run the simulation until `Ctrl-C`.
async fn run() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        intake_capacity = config.store.intake_capacity,
        pool_size = config.workers.pool_size,
        steps = config.movement.steps,
        step_delay_ms = config.movement.step_delay_ms,
        observer_port = config.observer.port,
        "Configuration loaded"
    );

    // 3. Build the store.
    let store = Arc::new(Store::from_config(&config));
    info!(
        departments = store.layout().departments().len(),
        entry = %store.layout().entry(),
        exit = %store.layout().exit(),
        "Store created"
    );

    // 4. Start the dispatcher.
    let dispatcher = spawn_dispatcher(Arc::clone(&store), config.workers.pool_size);

    // 5. Admit the initial population.
    if config.population.initial_customers > 0 {
        let admitted =
            population::admit_random(&store, config.population.initial_customers).await?;
        info!(count = admitted.len(), "Initial customers admitted");
    }

    // 6. Accident generator.
    let accidents = Arc::new(AccidentController::new(
        Arc::clone(&store),
        &config.accidents,
    ));
    if config.accidents.enabled_on_start {
        accidents.start().await?;
    }

    // 7. Stats publisher and observer server.
    let app_state = Arc::new(AppState::new(Arc::clone(&store), Arc::clone(&accidents)));
    let publisher = spawn_stats_publisher(
        Arc::clone(&app_state),
        config.observer.broadcast_interval(),
    );
    let observer = spawn_observer(ServerConfig::from(&config.observer), app_state).map_err(
        |e| EngineError::Observer {
            message: format!("{e}"),
        },
    )?;
    info!(
        host = %config.observer.host,
        port = config.observer.port,
        "Observer API server started"
    );

    // 8. Run until interrupted.
    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    observer.abort();
    publisher.abort();
    if accidents.is_running().await {
        accidents.stop().await?;
    }
    dispatcher.shutdown().await;

    info!(
        customers_remaining = store.roster_len().await,
        active_workers = store.workers().get(),
        "storesim-engine stopped"
    );
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load configuration from `storesim-config.yaml`, or defaults if the
/// file does not exist.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        Ok(SimulationConfig::parse("")?)
    }
}
