use serde::{Deserialize, Serialize};

use crate::i18n::I18nText;

/// Inclusive integer bounds enforced on numeric answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: i64,
    pub max: i64,
}

impl NumericRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// One selectable option. `value` is the model-facing encoding and is shared
/// by every language; only `label` is translated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: i64,
    pub label: I18nText,
}

/// Closed set of question kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Numeric {
        placeholder: I18nText,
        range: NumericRange,
    },
    SingleChoice {
        options: Vec<ChoiceOption>,
    },
}

/// Definition of a single question inside a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub key: String,
    pub label: I18nText,
    pub kind: QuestionKind,
}

impl QuestionSpec {
    pub fn numeric(
        key: impl Into<String>,
        label_key: &str,
        placeholder_key: &str,
        range: NumericRange,
    ) -> Self {
        Self {
            key: key.into(),
            label: I18nText::new(label_key),
            kind: QuestionKind::Numeric {
                placeholder: I18nText::new(placeholder_key),
                range,
            },
        }
    }

    pub fn single_choice(key: impl Into<String>, label_key: &str, options: &[(i64, &str)]) -> Self {
        Self {
            key: key.into(),
            label: I18nText::new(label_key),
            kind: QuestionKind::SingleChoice {
                options: options
                    .iter()
                    .map(|(value, label_key)| ChoiceOption {
                        value: *value,
                        label: I18nText::new(*label_key),
                    })
                    .collect(),
            },
        }
    }

    /// Every catalog key this question needs to be displayed.
    pub fn text_keys(&self) -> Vec<&str> {
        let mut keys = vec![self.label.key.as_str()];
        match &self.kind {
            QuestionKind::Numeric { placeholder, .. } => keys.push(placeholder.key.as_str()),
            QuestionKind::SingleChoice { options } => {
                keys.extend(options.iter().map(|option| option.label.key.as_str()))
            }
        }
        keys
    }

    pub fn option_values(&self) -> Vec<i64> {
        match &self.kind {
            QuestionKind::Numeric { .. } => Vec::new(),
            QuestionKind::SingleChoice { options } => {
                options.iter().map(|option| option.value).collect()
            }
        }
    }
}
