//! Hourly Steps - Demo CLI
//!
//! Walks the accumulator through a scripted afternoon: readings within an
//! hour, a rollover, a process restart and a gap of several silent hours,
//! rendering the complication after each step.

use chrono::{DateTime, Local, TimeZone};
use hourly_steps_lib::complication::{ComplicationProvider, ComplicationRequest, SensorStatus};
use hourly_steps_lib::core::ComplicationConfig;
use hourly_steps_lib::i18n::I18n;
use hourly_steps_lib::store::MemoryStore;
use hourly_steps_lib::tracker::HourlyStepAccumulator;
use std::sync::Arc;

fn at(hour: u32, minute: u32) -> Option<DateTime<Local>> {
    Local.with_ymd_and_hms(2024, 1, 15, hour, minute, 0).single()
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("==============================================");
    println!("   Hourly Steps - Demo CLI");
    println!("==============================================\n");

    let Some(start) = at(14, 0) else {
        eprintln!("14:00 does not exist in the local timezone on the demo date");
        return;
    };

    // Shared between the two accumulator instances to simulate a restart
    let store = MemoryStore::new();
    let accumulator = Arc::new(HourlyStepAccumulator::initialize(store.clone(), &start));

    let script: [(u32, u32, i64); 4] = [(14, 5, 1000), (14, 30, 1050), (14, 55, 1320), (15, 2, 1380)];

    println!("----------------------------------------------");
    println!("  Time  |  Total  |  Hour  |  Hourly  |  Text");
    println!("----------------------------------------------");

    for (hour, minute, total) in script {
        replay(&accumulator, hour, minute, total);
    }

    println!("\n  -- process restart --\n");
    drop(accumulator);
    let accumulator = Arc::new(HourlyStepAccumulator::initialize(store, &start));
    println!("  Resumed: {} steps this hour (no new readings)", accumulator.hourly_steps());

    println!("\n  -- sensor silent for two hours --\n");
    replay(&accumulator, 17, 10, 1500);
    replay(&accumulator, 17, 40, 1610);

    println!("\n  -- counter reset after device reboot --\n");
    replay(&accumulator, 17, 50, 25);

    println!("\n==============================================\n");

    let provider = ComplicationProvider::new(
        accumulator,
        SensorStatus::Unavailable("demo".to_string()),
        &ComplicationConfig::default(),
        I18n::new("auto"),
    );
    let data = provider.on_request(&ComplicationRequest::tap(1));
    println!("  Without a sensor: '{}' ({})", data.text, data.content_description);
    let preview = provider.preview();
    println!("  Picker preview:   '{}' ({})\n", preview.text, preview.content_description);
}

fn replay(accumulator: &Arc<HourlyStepAccumulator<MemoryStore>>, hour: u32, minute: u32, total: i64) {
    let Some(now) = at(hour, minute) else {
        eprintln!("  {:02}:{:02} skipped (not a valid local time)", hour, minute);
        return;
    };

    if let Err(e) = accumulator.report_reading(total, &now) {
        eprintln!("  Failed to persist reading: {}", e);
    }

    let provider = ComplicationProvider::new(
        accumulator.clone(),
        SensorStatus::Available,
        &ComplicationConfig::default(),
        I18n::new("en"),
    );
    let data = provider.on_request(&ComplicationRequest::tap(1));

    let state = accumulator.state();
    println!(
        "  {:02}:{:02} | {:>7} | {:>6} | {:>8} | {}",
        hour,
        minute,
        total,
        state.current_hour.map(|h| h.to_string()).unwrap_or_else(|| "-".to_string()),
        accumulator.hourly_steps(),
        data.text
    );
}
