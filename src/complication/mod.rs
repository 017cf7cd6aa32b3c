//! Watch-face complication data
//!
//! Pulls the hourly count from the accumulator and renders the short text
//! shown on the watch face: the number itself, a heart once the hourly goal
//! is reached, or `--` when no reading can be obtained.

use crate::core::ComplicationConfig;
use crate::i18n::{I18n, Message};
use crate::store::StateStore;
use crate::tracker::HourlyStepAccumulator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ERROR_TEXT: &str = "--";
pub const GOAL_TEXT: &str = "\u{2764}";
pub const ACTION_REFRESH_COMPLICATION: &str = "refresh_complication";
pub const PREVIEW_INSTANCE_ID: i32 = -1;

/// Why the complication is being refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTrigger {
    Scheduled,
    Tap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplicationRequest {
    pub instance_id: i32,
    pub trigger: RefreshTrigger,
}

impl ComplicationRequest {
    pub fn scheduled(instance_id: i32) -> Self {
        Self {
            instance_id,
            trigger: RefreshTrigger::Scheduled,
        }
    }

    pub fn tap(instance_id: i32) -> Self {
        Self {
            instance_id,
            trigger: RefreshTrigger::Tap,
        }
    }
}

/// Action fired when the complication is tapped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapAction {
    pub action: String,
    pub complication_id: i32,
}

/// Short-text complication payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplicationData {
    pub text: String,
    pub content_description: String,
    pub tap_action: Option<TapAction>,
}

/// Whether the step counter can be read at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorStatus {
    Available,
    Unavailable(String),
}

/// Builds complication data from the accumulator
pub struct ComplicationProvider<S: StateStore> {
    accumulator: Arc<HourlyStepAccumulator<S>>,
    status: SensorStatus,
    config: ComplicationConfig,
    i18n: I18n,
}

impl<S: StateStore> ComplicationProvider<S> {
    pub fn new(
        accumulator: Arc<HourlyStepAccumulator<S>>,
        status: SensorStatus,
        config: &ComplicationConfig,
        i18n: I18n,
    ) -> Self {
        Self {
            accumulator,
            status,
            config: config.clone(),
            i18n,
        }
    }

    pub fn set_status(&mut self, status: SensorStatus) {
        self.status = status;
    }

    /// Answer a refresh request with the current hourly count
    pub fn on_request(&self, request: &ComplicationRequest) -> ComplicationData {
        if let SensorStatus::Unavailable(reason) = &self.status {
            log::debug!("Complication {} showing error: {}", request.instance_id, reason);
            let message = self.i18n.text(Message::NoPermission, &[]);
            return self.render_error(&message, request.instance_id);
        }

        let steps = self.accumulator.hourly_steps();
        log::debug!(
            "Complication {} refreshed ({:?}): {} steps",
            request.instance_id,
            request.trigger,
            steps
        );
        self.render(steps, request.instance_id)
    }

    /// Sample data for the watch-face picker
    pub fn preview(&self) -> ComplicationData {
        self.render(self.config.preview_steps, PREVIEW_INSTANCE_ID)
    }

    fn render(&self, steps: i64, instance_id: i32) -> ComplicationData {
        let count = steps.to_string();
        let args = [("steps", count.as_str())];

        let (text, content_description) = if steps >= self.config.goal_steps {
            (
                GOAL_TEXT.to_string(),
                self.i18n.text(Message::GoalReached, &args),
            )
        } else {
            (
                count.clone(),
                self.i18n.text(Message::StepsThisHour, &args),
            )
        };

        ComplicationData {
            text,
            content_description,
            tap_action: Some(refresh_action(instance_id)),
        }
    }

    fn render_error(&self, message: &str, instance_id: i32) -> ComplicationData {
        ComplicationData {
            text: ERROR_TEXT.to_string(),
            content_description: self.i18n.text(Message::Error, &[("message", message)]),
            tap_action: Some(refresh_action(instance_id)),
        }
    }
}

fn refresh_action(instance_id: i32) -> TapAction {
    TapAction {
        action: ACTION_REFRESH_COMPLICATION.to_string(),
        complication_id: instance_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn provider_with_steps(steps: i64) -> ComplicationProvider<MemoryStore> {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();
        let acc = HourlyStepAccumulator::initialize(MemoryStore::new(), &start);
        acc.report_reading(1000, &start).unwrap();
        acc.report_reading(1000 + steps, &(start + chrono::Duration::minutes(10)))
            .unwrap();

        ComplicationProvider::new(
            Arc::new(acc),
            SensorStatus::Available,
            &ComplicationConfig::default(),
            I18n::new("en"),
        )
    }

    #[test]
    fn test_below_goal_shows_count() {
        let data = provider_with_steps(249).on_request(&ComplicationRequest::scheduled(7));
        assert_eq!(data.text, "249");
        assert_eq!(data.content_description, "249 steps this hour");
        assert_eq!(
            data.tap_action,
            Some(TapAction {
                action: ACTION_REFRESH_COMPLICATION.to_string(),
                complication_id: 7,
            })
        );
    }

    #[test]
    fn test_goal_reached_shows_heart() {
        let data = provider_with_steps(250).on_request(&ComplicationRequest::tap(3));
        assert_eq!(data.text, GOAL_TEXT);
        assert_eq!(data.content_description, "250 steps this hour - Goal reached!");
    }

    #[test]
    fn test_unavailable_sensor_shows_error() {
        let mut provider = provider_with_steps(10);
        provider.set_status(SensorStatus::Unavailable("disabled".to_string()));

        let data = provider.on_request(&ComplicationRequest::scheduled(1));
        assert_eq!(data.text, ERROR_TEXT);
        assert_eq!(data.content_description, "Steps: No permission");
    }

    #[test]
    fn test_preview() {
        let data = provider_with_steps(0).preview();
        assert_eq!(data.text, GOAL_TEXT);
        assert_eq!(data.content_description, "1234 steps this hour - Goal reached!");
        assert_eq!(data.tap_action.unwrap().complication_id, PREVIEW_INSTANCE_ID);
    }

    #[test]
    fn test_french_descriptions() {
        let mut provider = provider_with_steps(12);
        provider.i18n = I18n::new("fr");

        let data = provider.on_request(&ComplicationRequest::scheduled(1));
        assert_eq!(data.text, "12");
        assert_eq!(data.content_description, "12 pas cette heure");
    }

    #[test]
    fn test_serializes_to_json() {
        let data = provider_with_steps(5).on_request(&ComplicationRequest::scheduled(2));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["text"], "5");
        assert_eq!(json["tap_action"]["action"], ACTION_REFRESH_COMPLICATION);
    }
}
