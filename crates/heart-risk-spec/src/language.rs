use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unic_langid::LanguageIdentifier;

/// Display languages supported by the questionnaire.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

/// Writing direction hint for frontends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language `{0}` (expected `en` or `ar`)")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Language::En => TextDirection::Ltr,
            Language::Ar => TextDirection::Rtl,
        }
    }

    /// Maps a POSIX or BCP-47 locale (`ar_EG.UTF-8`, `en-GB`) onto a supported language.
    pub fn from_locale(raw: &str) -> Option<Self> {
        let mut cleaned = raw.trim();
        if cleaned.is_empty() {
            return None;
        }
        if let Some((head, _)) = cleaned.split_once('.') {
            cleaned = head;
        }
        if let Some((head, _)) = cleaned.split_once('@') {
            cleaned = head;
        }
        let cleaned = cleaned.replace('_', "-");
        let lid = cleaned.parse::<LanguageIdentifier>().ok()?;
        match lid.language.as_str().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_locale(s).ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_posix_and_bcp47_locales() {
        assert_eq!(Language::from_locale("ar_EG.UTF-8"), Some(Language::Ar));
        assert_eq!(Language::from_locale("en-GB"), Some(Language::En));
        assert_eq!(Language::from_locale("AR"), Some(Language::Ar));
        assert_eq!(Language::from_locale("C"), None);
        assert_eq!(Language::from_locale("fr-FR"), None);
        assert_eq!(Language::from_locale("  "), None);
    }

    #[test]
    fn arabic_is_right_to_left() {
        assert_eq!(Language::Ar.direction(), TextDirection::Rtl);
        assert_eq!(Language::En.direction(), TextDirection::Ltr);
        assert_eq!("ar".parse::<Language>(), Ok(Language::Ar));
        assert!("de".parse::<Language>().is_err());
    }
}
