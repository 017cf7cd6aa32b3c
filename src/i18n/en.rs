//! English templates

use super::Message;

pub(super) fn template(message: Message) -> &'static str {
    match message {
        Message::StepsThisHour => "{steps} steps this hour",
        Message::GoalReached => "{steps} steps this hour - Goal reached!",
        Message::Error => "Steps: {message}",
        Message::NoPermission => "No permission",
    }
}
