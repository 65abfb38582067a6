use serde::{Deserialize, Serialize};

use crate::i18n::I18nText;
use crate::spec::question::QuestionSpec;

/// Top-level questionnaire definition shared by every display language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSpec {
    pub id: String,
    pub version: String,
    pub title: I18nText,
    pub description: I18nText,
    pub questions: Vec<QuestionSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<I18nText>,
}

impl FormSpec {
    pub fn question(&self, index: usize) -> Option<&QuestionSpec> {
        self.questions.get(index)
    }

    pub fn question_by_key(&self, key: &str) -> Option<&QuestionSpec> {
        self.questions.iter().find(|question| question.key == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.questions.iter().position(|question| question.key == key)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.questions.len().checked_sub(1)
    }

    pub fn text_keys(&self) -> Vec<&str> {
        let mut keys = vec![self.title.key.as_str(), self.description.key.as_str()];
        for question in &self.questions {
            keys.extend(question.text_keys());
        }
        keys.extend(self.tips.iter().map(|tip| tip.key.as_str()));
        keys
    }
}
