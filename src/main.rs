//! Hourly Steps - Main entry point
//!
//! Headless host for the step accumulator: feeds sensor readings into it and
//! emits the complication payload as a JSON line on every scheduled refresh.

use anyhow::Context;
use hourly_steps_lib::complication::{ComplicationProvider, ComplicationRequest, SensorStatus};
use hourly_steps_lib::core::{Config, StorageConfig};
use hourly_steps_lib::db::Database;
use hourly_steps_lib::i18n::I18n;
use hourly_steps_lib::sensor::StepSensor;
use hourly_steps_lib::service::{self, StepCounterService};
use hourly_steps_lib::store::{MemoryStore, StateStore};
use hourly_steps_lib::tracker::HourlyStepAccumulator;
use std::io::Write;
use std::sync::Arc;

/// Complication slot rendered by the refresh loop
const COMPLICATION_INSTANCE_ID: i32 = 0;

type Accumulator = HourlyStepAccumulator<Box<dyn StateStore>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Hourly Steps v{}", env!("CARGO_PKG_VERSION"));

    // Load or create configuration
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    let store = open_store(&config.storage);
    let accumulator: Arc<Accumulator> =
        Arc::new(HourlyStepAccumulator::initialize(store, &chrono::Local::now()));

    let status = match StepSensor::from_config(&config.sensor) {
        Ok(sensor) => {
            let (events, _sensor_task) = service::spawn_sensor(sensor);
            let step_service = StepCounterService::new(accumulator.clone());
            tokio::spawn(async move {
                step_service.run(events).await;
            });
            SensorStatus::Available
        }
        Err(e) => {
            log::error!("Step counter sensor not available: {}", e);
            SensorStatus::Unavailable(e.to_string())
        }
    };

    let provider = ComplicationProvider::new(
        accumulator,
        status,
        &config.complication,
        I18n::new(&config.general.language),
    );
    log::debug!("Preview: {:?}", provider.preview());

    refresh_loop(&provider, config.general.refresh_rate_ms).await
}

/// Open the configured backend, degrading to memory if durable storage fails
fn open_store(config: &StorageConfig) -> Box<dyn StateStore> {
    if config.backend == "memory" {
        log::info!("Using in-memory state store");
        return Box::new(MemoryStore::new());
    }

    if config.backend != "sqlite" {
        log::warn!("Unknown storage backend '{}', using sqlite", config.backend);
    }

    match config.database_path().and_then(|path| Database::open(&path)) {
        Ok(db) => Box::new(db),
        Err(e) => {
            log::error!("Failed to open state database, state will not survive restarts: {}", e);
            Box::new(MemoryStore::new())
        }
    }
}

/// Emit the complication payload on a schedule until interrupted
async fn refresh_loop(
    provider: &ComplicationProvider<Box<dyn StateStore>>,
    refresh_ms: u64,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(tokio::time::Duration::from_millis(refresh_ms.max(1)));
    log::info!("Complication refresh every {}ms", refresh_ms);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let data = provider.on_request(&ComplicationRequest::scheduled(COMPLICATION_INSTANCE_ID));
                let line = serde_json::to_string(&data).context("Failed to encode complication data")?;

                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", line).context("Failed to write complication data")?;
                stdout.flush()?;
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for shutdown signal")?;
                log::info!("Shutting down");
                return Ok(());
            }
        }
    }
}
