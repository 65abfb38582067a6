use serde::Serialize;
use thiserror::Error;

use crate::answers::{AnswerSet, AnswerValue};
use crate::content::{ContentTables, keys, ui};
use crate::i18n::I18nText;
use crate::language::Language;
use crate::model::{PredictionRequest, Sex};
use crate::spec::{FormSpec, NumericRange, QuestionKind, QuestionSpec};

/// Why a stored answer does not fit its question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum AnswerIssue {
    Missing,
    NotANumber { raw: String },
    OutOfRange { min: i64, max: i64 },
    UnknownOption { value: String },
}

/// Local, recoverable error that blocks advancing past a question.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid answer for `{key}`: {}", describe(.issue))]
pub struct InvalidAnswerInput {
    pub key: String,
    pub issue: AnswerIssue,
}

fn describe(issue: &AnswerIssue) -> String {
    match issue {
        AnswerIssue::Missing => "no answer given".to_string(),
        AnswerIssue::NotANumber { raw } => format!("`{raw}` is not a whole number"),
        AnswerIssue::OutOfRange { min, max } => format!("expected a value in {min}..={max}"),
        AnswerIssue::UnknownOption { value } => format!("`{value}` is not one of the options"),
    }
}

impl InvalidAnswerInput {
    fn new(key: &str, issue: AnswerIssue) -> Self {
        Self {
            key: key.to_string(),
            issue,
        }
    }

    /// User-facing message in the active language.
    pub fn message(&self, tables: &ContentTables, language: Language) -> String {
        let text = match &self.issue {
            AnswerIssue::Missing => I18nText::new(ui::VALIDATION_REQUIRED),
            AnswerIssue::NotANumber { .. } => I18nText::new(ui::VALIDATION_NOT_A_NUMBER),
            AnswerIssue::OutOfRange { min, max } => I18nText::new(ui::VALIDATION_OUT_OF_RANGE)
                .with_arg("min", *min)
                .with_arg("max", *max),
            AnswerIssue::UnknownOption { .. } => I18nText::new(ui::VALIDATION_UNKNOWN_OPTION),
        };
        tables.text(language, &text)
    }
}

/// Checks one answer against its question and returns the coerced integer.
pub fn validate_answer(
    question: &QuestionSpec,
    value: Option<&AnswerValue>,
) -> Result<i64, InvalidAnswerInput> {
    let Some(value) = value else {
        return Err(InvalidAnswerInput::new(&question.key, AnswerIssue::Missing));
    };
    if matches!(value, AnswerValue::Text(raw) if raw.trim().is_empty()) {
        return Err(InvalidAnswerInput::new(&question.key, AnswerIssue::Missing));
    }

    match &question.kind {
        QuestionKind::Numeric { range, .. } => {
            let number = value.as_int().ok_or_else(|| {
                InvalidAnswerInput::new(
                    &question.key,
                    AnswerIssue::NotANumber {
                        raw: value.to_string(),
                    },
                )
            })?;
            check_range(&question.key, *range, number)
        }
        QuestionKind::SingleChoice { options } => value
            .as_int()
            .filter(|number| options.iter().any(|option| option.value == *number))
            .ok_or_else(|| {
                InvalidAnswerInput::new(
                    &question.key,
                    AnswerIssue::UnknownOption {
                        value: value.to_string(),
                    },
                )
            }),
    }
}

fn check_range(key: &str, range: NumericRange, number: i64) -> Result<i64, InvalidAnswerInput> {
    if range.contains(number) {
        Ok(number)
    } else {
        Err(InvalidAnswerInput::new(
            key,
            AnswerIssue::OutOfRange {
                min: range.min,
                max: range.max,
            },
        ))
    }
}

/// Validates every question in form order.
pub fn validate(form: &FormSpec, answers: &AnswerSet) -> Vec<InvalidAnswerInput> {
    form.questions
        .iter()
        .filter_map(|question| validate_answer(question, answers.get(&question.key)).err())
        .collect()
}

/// Builds the typed prediction request. Fails with the first invalid answer in form order.
pub fn build_request(
    form: &FormSpec,
    answers: &AnswerSet,
) -> Result<PredictionRequest, InvalidAnswerInput> {
    if let Some(first) = validate(form, answers).into_iter().next() {
        return Err(first);
    }

    let number = |key: &str| -> Result<i64, InvalidAnswerInput> {
        let question = form
            .question_by_key(key)
            .ok_or_else(|| InvalidAnswerInput::new(key, AnswerIssue::Missing))?;
        validate_answer(question, answers.get(key))
    };
    let flag = |key: &str| number(key).map(|value| value != 0);

    let age = number(keys::AGE)?;
    let sex = number(keys::SEX)?;
    let activity = number(keys::PHYSICAL_ACTIVITY)?;

    Ok(PredictionRequest {
        age: u16::try_from(age).map_err(|_| out_of_range(form, keys::AGE))?,
        sex: Sex::from_code(sex).ok_or_else(|| {
            InvalidAnswerInput::new(
                keys::SEX,
                AnswerIssue::UnknownOption {
                    value: sex.to_string(),
                },
            )
        })?,
        diabetes: flag(keys::DIABETES)?,
        family_history: flag(keys::FAMILY_HISTORY)?,
        smoking: flag(keys::SMOKING)?,
        physical_activity_days: u8::try_from(activity)
            .map_err(|_| out_of_range(form, keys::PHYSICAL_ACTIVITY))?,
    })
}

fn out_of_range(form: &FormSpec, key: &str) -> InvalidAnswerInput {
    let issue = match form.question_by_key(key).map(|question| &question.kind) {
        Some(QuestionKind::Numeric { range, .. }) => AnswerIssue::OutOfRange {
            min: range.min,
            max: range.max,
        },
        _ => AnswerIssue::Missing,
    };
    InvalidAnswerInput::new(key, issue)
}
