//! Built-in questionnaire content.
//!
//! The form is defined once: keys, kinds, option values and ranges are
//! language independent, and every display string is an [`I18nText`] key
//! resolved against the per-language catalogs in `i18n/*.json`. Both
//! languages therefore always see the same questions in the same order.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::i18n::{Catalog, I18nText, parse_catalog, resolve};
use crate::language::Language;
use crate::spec::{FormSpec, NumericRange, QuestionKind, QuestionSpec};

pub const FORM_ID: &str = "heart-risk";
pub const FORM_VERSION: &str = "1.0.0";

const EN_CATALOG: &str = include_str!("../i18n/en.json");
const AR_CATALOG: &str = include_str!("../i18n/ar.json");

/// Answer keys. They double as the model-facing field names.
pub mod keys {
    pub const AGE: &str = "Age";
    pub const SEX: &str = "Sex";
    pub const DIABETES: &str = "Diabetes";
    pub const FAMILY_HISTORY: &str = "FamilyHistory";
    pub const SMOKING: &str = "Smoking";
    pub const PHYSICAL_ACTIVITY: &str = "PhysicalActivity";
}

/// Catalog keys for interface chrome (buttons, headings, messages).
pub mod ui {
    pub const TAB_QUESTIONNAIRE: &str = "tab.questionnaire";
    pub const TAB_INFO: &str = "tab.info";
    pub const PROGRESS: &str = "progress.question";
    pub const SELECT_PLACEHOLDER: &str = "select.placeholder";
    pub const PREVIOUS: &str = "action.previous";
    pub const NEXT: &str = "action.next";
    pub const SUBMIT: &str = "action.submit";
    pub const START_OVER: &str = "action.start_over";
    pub const RETRY: &str = "action.retry";
    pub const RESULT_LOW: &str = "result.low";
    pub const RESULT_HIGH: &str = "result.high";
    pub const RESULT_PROBABILITY: &str = "result.probability";
    pub const RESULT_PENDING: &str = "result.pending";
    pub const RESULT_UNAVAILABLE: &str = "result.unavailable";
    pub const INFO_HEADING: &str = "info.heading";
    pub const VALIDATION_REQUIRED: &str = "validation.required";
    pub const VALIDATION_NOT_A_NUMBER: &str = "validation.not_a_number";
    pub const VALIDATION_OUT_OF_RANGE: &str = "validation.out_of_range";
    pub const VALIDATION_UNKNOWN_OPTION: &str = "validation.unknown_option";
    pub const LANGUAGE_EN: &str = "language.en";
    pub const LANGUAGE_AR: &str = "language.ar";

    pub const ALL: &[&str] = &[
        TAB_QUESTIONNAIRE,
        TAB_INFO,
        PROGRESS,
        SELECT_PLACEHOLDER,
        PREVIOUS,
        NEXT,
        SUBMIT,
        START_OVER,
        RETRY,
        RESULT_LOW,
        RESULT_HIGH,
        RESULT_PROBABILITY,
        RESULT_PENDING,
        RESULT_UNAVAILABLE,
        INFO_HEADING,
        VALIDATION_REQUIRED,
        VALIDATION_NOT_A_NUMBER,
        VALIDATION_OUT_OF_RANGE,
        VALIDATION_UNKNOWN_OPTION,
        LANGUAGE_EN,
        LANGUAGE_AR,
    ];
}

const NO_YES: &[(i64, &str)] = &[(0, "option.no"), (1, "option.yes")];

/// The six-question heart-risk form.
pub fn heart_risk_form() -> FormSpec {
    FormSpec {
        id: FORM_ID.to_string(),
        version: FORM_VERSION.to_string(),
        title: I18nText::new("form.title"),
        description: I18nText::new("form.description"),
        questions: vec![
            QuestionSpec::numeric(
                keys::AGE,
                "question.age.label",
                "question.age.placeholder",
                NumericRange::new(1, 120),
            ),
            QuestionSpec::single_choice(
                keys::SEX,
                "question.sex.label",
                &[(0, "question.sex.male"), (1, "question.sex.female")],
            ),
            QuestionSpec::single_choice(keys::DIABETES, "question.diabetes.label", NO_YES),
            QuestionSpec::single_choice(
                keys::FAMILY_HISTORY,
                "question.family_history.label",
                NO_YES,
            ),
            QuestionSpec::single_choice(keys::SMOKING, "question.smoking.label", NO_YES),
            QuestionSpec::numeric(
                keys::PHYSICAL_ACTIVITY,
                "question.physical_activity.label",
                "question.physical_activity.placeholder",
                NumericRange::new(0, 7),
            ),
        ],
        tips: ["tips.diet", "tips.exercise", "tips.smoking", "tips.stress", "tips.checkups"]
            .into_iter()
            .map(I18nText::new)
            .collect(),
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("catalog for `{language}` is not valid JSON: {source}")]
    Catalog {
        language: Language,
        #[source]
        source: serde_json::Error,
    },
    #[error("no catalog provided for `{0}`")]
    MissingCatalog(Language),
    #[error("catalog for `{language}` is missing text `{key}`")]
    MissingText { language: Language, key: String },
    #[error("form `{0}` has no questions")]
    EmptyForm(String),
    #[error("question key `{0}` is defined more than once")]
    DuplicateKey(String),
    #[error("question `{0}` has no options")]
    EmptyOptions(String),
    #[error("question `{key}` repeats option value {value}")]
    DuplicateOption { key: String, value: i64 },
    #[error("question `{key}` has an empty range {min}..={max}")]
    EmptyRange { key: String, min: i64, max: i64 },
}

/// A question with every display string resolved for one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedQuestion {
    pub key: String,
    pub label: String,
    pub kind: LocalizedKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocalizedKind {
    Numeric {
        placeholder: String,
        range: NumericRange,
    },
    SingleChoice {
        options: Vec<LocalizedOption>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedOption {
    pub value: i64,
    pub label: String,
}

/// Language-parameterized lookup over one form and its catalogs.
#[derive(Debug, Clone)]
pub struct ContentTables {
    form: FormSpec,
    catalogs: BTreeMap<Language, Catalog>,
}

impl ContentTables {
    /// Loads the built-in form together with the embedded English and Arabic catalogs.
    pub fn builtin() -> Result<Self, ContentError> {
        let mut catalogs = BTreeMap::new();
        for (language, raw) in [(Language::En, EN_CATALOG), (Language::Ar, AR_CATALOG)] {
            let catalog =
                parse_catalog(raw).map_err(|source| ContentError::Catalog { language, source })?;
            catalogs.insert(language, catalog);
        }
        Self::new(heart_risk_form(), catalogs)
    }

    /// Checks the form and that every text it references exists in every language.
    pub fn new(
        form: FormSpec,
        catalogs: BTreeMap<Language, Catalog>,
    ) -> Result<Self, ContentError> {
        if form.questions.is_empty() {
            return Err(ContentError::EmptyForm(form.id.clone()));
        }
        let mut seen = BTreeSet::new();
        for question in &form.questions {
            if !seen.insert(question.key.as_str()) {
                return Err(ContentError::DuplicateKey(question.key.clone()));
            }
            match &question.kind {
                QuestionKind::Numeric { range, .. } if range.min > range.max => {
                    return Err(ContentError::EmptyRange {
                        key: question.key.clone(),
                        min: range.min,
                        max: range.max,
                    });
                }
                QuestionKind::Numeric { .. } => {}
                QuestionKind::SingleChoice { options } => {
                    if options.is_empty() {
                        return Err(ContentError::EmptyOptions(question.key.clone()));
                    }
                    let mut values = BTreeSet::new();
                    for option in options {
                        if !values.insert(option.value) {
                            return Err(ContentError::DuplicateOption {
                                key: question.key.clone(),
                                value: option.value,
                            });
                        }
                    }
                }
            }
        }

        for language in Language::ALL {
            let catalog = catalogs
                .get(&language)
                .ok_or(ContentError::MissingCatalog(language))?;
            let required = form.text_keys().into_iter().chain(ui::ALL.iter().copied());
            for key in required {
                if !catalog.contains_key(key) {
                    return Err(ContentError::MissingText {
                        language,
                        key: key.to_string(),
                    });
                }
            }
        }

        Ok(Self { form, catalogs })
    }

    pub fn form(&self) -> &FormSpec {
        &self.form
    }

    pub fn question_count(&self) -> usize {
        self.form.questions.len()
    }

    pub fn text(&self, language: Language, text: &I18nText) -> String {
        match self.catalogs.get(&language) {
            Some(catalog) => resolve(catalog, text),
            None => text.key.clone(),
        }
    }

    /// Shorthand for [`ContentTables::text`] with a bare key.
    pub fn message(&self, language: Language, key: &str) -> String {
        self.text(language, &I18nText::new(key))
    }

    pub fn question(&self, language: Language, index: usize) -> Option<LocalizedQuestion> {
        self.form
            .question(index)
            .map(|question| self.localize(language, question))
    }

    pub fn questions(&self, language: Language) -> Vec<LocalizedQuestion> {
        self.form
            .questions
            .iter()
            .map(|question| self.localize(language, question))
            .collect()
    }

    pub fn tips(&self, language: Language) -> Vec<String> {
        self.form
            .tips
            .iter()
            .map(|tip| self.text(language, tip))
            .collect()
    }

    fn localize(&self, language: Language, question: &QuestionSpec) -> LocalizedQuestion {
        let kind = match &question.kind {
            QuestionKind::Numeric { placeholder, range } => LocalizedKind::Numeric {
                placeholder: self.text(language, placeholder),
                range: *range,
            },
            QuestionKind::SingleChoice { options } => LocalizedKind::SingleChoice {
                options: options
                    .iter()
                    .map(|option| LocalizedOption {
                        value: option.value,
                        label: self.text(language, &option.label),
                    })
                    .collect(),
            },
        };
        LocalizedQuestion {
            key: question.key.clone(),
            label: self.text(language, &question.label),
            kind,
        }
    }
}
