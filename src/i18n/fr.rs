//! French templates

use super::Message;

pub(super) fn template(message: Message) -> &'static str {
    match message {
        Message::StepsThisHour => "{steps} pas cette heure",
        Message::GoalReached => "{steps} pas cette heure - Objectif atteint\u{00A0}!",
        Message::Error => "Pas\u{00A0}: {message}",
        Message::NoPermission => "Autorisation manquante",
    }
}
