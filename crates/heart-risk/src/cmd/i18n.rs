use std::collections::BTreeMap;
use std::env;

use once_cell::sync::Lazy;
use risk_spec::Language;

type Messages = BTreeMap<String, String>;

static EN_MESSAGES: Lazy<Messages> = Lazy::new(|| {
    let raw = include_str!("../../i18n/en.json");
    serde_json::from_str(raw).unwrap_or_default()
});

static AR_MESSAGES: Lazy<Messages> = Lazy::new(|| {
    let raw = include_str!("../../i18n/ar.json");
    serde_json::from_str(raw).unwrap_or_default()
});

fn detect_env_locale() -> Option<String> {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(val) = env::var(key) {
            let trimmed = val.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn detect_system_locale() -> Option<String> {
    sys_locale::get_locale()
}

/// Picks the display language: `--locale`, then the config file, then the
/// environment, then the OS locale. Unsupported candidates are skipped.
pub fn select_language(cli_locale: Option<&str>, config_locale: Option<&str>) -> Language {
    if let Some(found) = explicit_language(cli_locale, config_locale) {
        return found;
    }
    if let Some(env_loc) = detect_env_locale()
        && let Some(found) = Language::from_locale(&env_loc)
    {
        return found;
    }
    if let Some(sys_loc) = detect_system_locale()
        && let Some(found) = Language::from_locale(&sys_loc)
    {
        return found;
    }
    Language::En
}

fn explicit_language(cli_locale: Option<&str>, config_locale: Option<&str>) -> Option<Language> {
    [cli_locale, config_locale]
        .into_iter()
        .flatten()
        .find_map(Language::from_locale)
}

fn messages(language: Language) -> &'static Messages {
    match language {
        Language::En => &EN_MESSAGES,
        Language::Ar => &AR_MESSAGES,
    }
}

pub fn tr(language: Language, key: &str) -> String {
    messages(language)
        .get(key)
        .or_else(|| EN_MESSAGES.get(key))
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

/// Like [`tr`], filling each `{}` in order.
pub fn trf(language: Language, key: &str, args: &[&str]) -> String {
    let mut msg = tr(language, key);
    for arg in args {
        msg = msg.replacen("{}", arg, 1);
    }
    msg
}
