use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// A stored answer. Numeric fields keep the raw entered text until validation;
/// choice fields hold the selected option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Int(i64),
    Text(String),
}

impl AnswerValue {
    /// Integer view of the value. Text is trimmed and Arabic-Indic digits are
    /// read as their ASCII counterparts before parsing.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AnswerValue::Int(value) => Some(*value),
            AnswerValue::Text(raw) => raw
                .trim()
                .chars()
                .map(ascii_digit)
                .collect::<String>()
                .parse()
                .ok(),
        }
    }
}

fn ascii_digit(c: char) -> char {
    let base = match c {
        '\u{0660}'..='\u{0669}' => 0x0660,
        '\u{06F0}'..='\u{06F9}' => 0x06F0,
        _ => return c,
    };
    char::from_digit(u32::from(c) - base, 10).unwrap_or(c)
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Int(value) => write!(f, "{value}"),
            AnswerValue::Text(raw) => f.write_str(raw),
        }
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        AnswerValue::Int(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

/// Optional metadata paired with an `AnswerSet`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Answers collected for one form version, keyed by question key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    pub form_id: String,
    pub spec_version: String,
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl AnswerSet {
    /// Creates a fresh empty answer set for a form.
    pub fn new(form_id: impl Into<String>, spec_version: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            spec_version: spec_version.into(),
            answers: BTreeMap::new(),
            meta: None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.answers.get(key)
    }

    /// Inserts or replaces an answer. Returns `false` when the stored value was already equal.
    pub fn upsert(&mut self, key: impl Into<String>, value: AnswerValue) -> bool {
        let key = key.into();
        if self.answers.get(&key) == Some(&value) {
            return false;
        }
        self.answers.insert(key, value);
        true
    }

    pub fn clear(&mut self) {
        self.answers.clear();
        self.meta = None;
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.answers.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Records `now` as the update time, and as the creation time on first stamp.
    pub fn stamp(&mut self, now: OffsetDateTime) {
        let Ok(formatted) = now.format(&Rfc3339) else {
            return;
        };
        let meta = self.meta.get_or_insert_with(Meta::default);
        if meta.created_at.is_none() {
            meta.created_at = Some(formatted.clone());
        }
        meta.updated_at = Some(formatted);
    }

    /// Serializes the answers set as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn text_is_trimmed_before_parsing() {
        assert_eq!(AnswerValue::from(" 45 ").as_int(), Some(45));
        assert_eq!(AnswerValue::from("forty").as_int(), None);
        assert_eq!(AnswerValue::Int(3).as_int(), Some(3));
    }

    #[test]
    fn arabic_indic_digits_parse_as_numbers() {
        assert_eq!(AnswerValue::from("٤٥").as_int(), Some(45));
        assert_eq!(AnswerValue::from(" ۷ ").as_int(), Some(7));
        assert_eq!(AnswerValue::from("-٣").as_int(), Some(-3));
        assert_eq!(AnswerValue::from("٤x").as_int(), None);
    }

    #[test]
    fn upsert_reports_changes_only() {
        let mut answers = AnswerSet::new("heart-risk", "1.0.0");
        assert!(answers.upsert("Age", "45".into()));
        assert!(!answers.upsert("Age", "45".into()));
        assert!(answers.upsert("Age", "46".into()));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn stamp_keeps_creation_time() {
        let mut answers = AnswerSet::new("heart-risk", "1.0.0");
        answers.stamp(datetime!(2024-05-01 10:00 UTC));
        answers.stamp(datetime!(2024-05-01 10:05 UTC));
        let meta = answers.meta.as_ref().map(Clone::clone).unwrap_or_default();
        assert_eq!(meta.created_at.as_deref(), Some("2024-05-01T10:00:00Z"));
        assert_eq!(meta.updated_at.as_deref(), Some("2024-05-01T10:05:00Z"));
    }

    #[test]
    fn untagged_values_round_trip_from_json() {
        let raw = r#"{"form_id":"heart-risk","spec_version":"1.0.0","answers":{"Age":"50","Sex":1}}"#;
        let answers: AnswerSet = serde_json::from_str(raw).expect("parse");
        assert_eq!(answers.get("Age"), Some(&AnswerValue::Text("50".into())));
        assert_eq!(answers.get("Sex"), Some(&AnswerValue::Int(1)));
    }
}
