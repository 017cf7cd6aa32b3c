//! Background step counter service
//!
//! Bridges a blocking [`StepSensor`] to the accumulator: the sensor is polled
//! on a blocking task and its readings are handed over an `mpsc` channel to
//! [`StepCounterService::run`], which reports each one in arrival order.

use crate::core::StepEvent;
use crate::sensor::StepSensor;
use crate::store::StateStore;
use crate::tracker::HourlyStepAccumulator;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Readings buffered between the sensor task and the service
const EVENT_BUFFER: usize = 64;

/// Start polling the sensor on a blocking task
///
/// The channel closes when the source is exhausted, fails, or the
/// receiver is dropped.
pub fn spawn_sensor(mut sensor: StepSensor) -> (mpsc::Receiver<StepEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);

    let handle = tokio::task::spawn_blocking(move || {
        log::info!("Step sensor registered: {}", sensor.get_source_name());
        loop {
            match sensor.next_event() {
                Ok(Some(event)) => {
                    if tx.blocking_send(event).is_err() {
                        log::debug!("Service stopped, releasing step sensor");
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log::error!("Step sensor failed: {}", e);
                    break;
                }
            }
        }
        log::info!("Step sensor unregistered");
    });

    (rx, handle)
}

pub struct StepCounterService<S: StateStore> {
    accumulator: Arc<HourlyStepAccumulator<S>>,
}

impl<S: StateStore + 'static> StepCounterService<S> {
    pub fn new(accumulator: Arc<HourlyStepAccumulator<S>>) -> Self {
        Self { accumulator }
    }

    /// Report every reading until the channel closes
    ///
    /// Returns the number of readings processed. Storage failures are logged
    /// and do not stop the loop.
    pub async fn run(&self, mut events: mpsc::Receiver<StepEvent>) -> u64 {
        log::info!("Step counter service started");
        let mut processed = 0;

        while let Some(event) = events.recv().await {
            if let Err(e) = self
                .accumulator
                .report_reading(event.total_steps, &event.timestamp)
            {
                log::warn!("Reading kept in memory only: {}", e);
            }
            processed += 1;
        }

        log::info!("Step counter service stopped after {} readings", processed);
        processed
    }

    pub fn accumulator(&self) -> &Arc<HourlyStepAccumulator<S>> {
        &self.accumulator
    }
}
