//! Line-oriented step counter feed
//!
//! Each line is either `<total>` (stamped on arrival) or
//! `<RFC 3339 timestamp> <total>`. Blank lines and `#` comments are ignored,
//! malformed lines are logged and skipped.

use crate::core::{Error, Result, StepEvent};
use crate::sensor::StepSource;
use chrono::{DateTime, Local};
use std::io::BufRead;

pub struct ReaderStepSource<R> {
    name: String,
    reader: R,
    line: String,
}

impl<R: BufRead> ReaderStepSource<R> {
    pub fn new(name: &str, reader: R) -> Self {
        Self {
            name: name.to_string(),
            reader,
            line: String::new(),
        }
    }
}

/// Parse a single feed line; `Ok(None)` for blank lines and comments
pub fn parse_line(line: &str) -> Result<Option<StepEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let (timestamp, total) = match (parts.next(), parts.next(), parts.next()) {
        (Some(total), None, None) => (None, total),
        (Some(timestamp), Some(total), None) => (Some(timestamp), total),
        _ => return Err(Error::InvalidReading(format!("unexpected fields in '{}'", line))),
    };

    let total_steps: i64 = total
        .parse()
        .map_err(|e| Error::InvalidReading(format!("bad step count '{}': {}", total, e)))?;

    let timestamp = match timestamp {
        Some(ts) => DateTime::parse_from_rfc3339(ts)
            .map_err(|e| Error::InvalidReading(format!("bad timestamp '{}': {}", ts, e)))?
            .with_timezone(&Local),
        None => Local::now(),
    };

    Ok(Some(StepEvent::new(total_steps, timestamp)))
}

impl<R: BufRead> StepSource for ReaderStepSource<R> {
    fn next_event(&mut self) -> Result<Option<StepEvent>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                log::info!("{} feed ended", self.name);
                return Ok(None);
            }

            match parse_line(&self.line) {
                Ok(Some(event)) => return Ok(Some(event)),
                Ok(None) => continue,
                Err(e) => log::warn!("Skipping {} line: {}", self.name, e),
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_simulated(&self) -> bool {
        false
    }
}
