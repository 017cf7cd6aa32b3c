//! Complication strings in English and French
//!
//! Every [`Message`] has a template in each [`Language`]; the per-language
//! tables are exhaustive matches, so a missing translation fails to compile.
//! Templates carry `{name}` placeholders filled by [`I18n::text`].

mod en;
mod fr;

/// Strings the complication can display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// `{steps}`
    StepsThisHour,
    /// `{steps}`
    GoalReached,
    /// `{message}`
    Error,
    NoPermission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    French,
}

impl Language {
    /// Resolve a `general.language` setting; `auto` (or empty) follows the locale
    pub fn from_setting(setting: &str) -> Self {
        match setting.trim() {
            "" | "auto" => system_locale()
                .map(|locale| Self::from_locale(&locale))
                .unwrap_or_default(),
            other => Self::from_locale(other),
        }
    }

    /// Map a locale such as `fr_CA.UTF-8` or `fr-BE` to a language
    pub fn from_locale(locale: &str) -> Self {
        let code = locale.split(['_', '.', '-', '@']).next().unwrap_or_default();
        if code.eq_ignore_ascii_case("fr") {
            Self::French
        } else {
            Self::English
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
        }
    }

    fn template(self, message: Message) -> &'static str {
        match self {
            Self::English => en::template(message),
            Self::French => fr::template(message),
        }
    }
}

/// Renders [`Message`]s in one language
#[derive(Debug, Clone, Copy)]
pub struct I18n {
    language: Language,
}

impl I18n {
    pub fn new(setting: &str) -> Self {
        let language = Language::from_setting(setting);
        log::info!("Complication language: {}", language.code());
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Render a message, substituting each `{name}` with its value
    pub fn text(&self, message: Message, args: &[(&str, &str)]) -> String {
        let mut text = self.language.template(message).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }
}

/// First non-empty locale variable, in POSIX precedence order
fn system_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_filled() {
        let i18n = I18n::new("en");
        assert_eq!(
            i18n.text(Message::StepsThisHour, &[("steps", "42")]),
            "42 steps this hour"
        );
        assert_eq!(
            i18n.text(Message::Error, &[("message", "No permission")]),
            "Steps: No permission"
        );
    }

    #[test]
    fn test_unknown_placeholder_is_left_alone() {
        let i18n = I18n::new("en");
        assert_eq!(
            i18n.text(Message::StepsThisHour, &[("other", "1")]),
            "{steps} steps this hour"
        );
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!(Language::from_locale("fr_FR.UTF-8"), Language::French);
        assert_eq!(Language::from_locale("fr-BE"), Language::French);
        assert_eq!(Language::from_locale("FR"), Language::French);
        assert_eq!(Language::from_locale("fr@euro"), Language::French);
        assert_eq!(Language::from_locale("en_US.UTF-8"), Language::English);
        assert_eq!(Language::from_locale("C"), Language::English);
        assert_eq!(Language::from_locale(""), Language::English);
    }

    #[test]
    fn test_explicit_setting_ignores_locale() {
        assert_eq!(I18n::new("fr").language(), Language::French);
        assert_eq!(I18n::new(" en ").language(), Language::English);
        assert_eq!(I18n::new("de").language(), Language::English);
        assert_eq!(I18n::new("de").language().code(), "en");
    }

    #[test]
    fn test_french_templates() {
        let i18n = I18n::new("fr");
        assert_eq!(i18n.text(Message::StepsThisHour, &[("steps", "7")]), "7 pas cette heure");
        assert_eq!(i18n.text(Message::NoPermission, &[]), "Autorisation manquante");
    }
}
