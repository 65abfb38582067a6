use serde::Serialize;
use serde_json::{Value, json};

use crate::answers::AnswerValue;
use crate::content::{ContentTables, LocalizedKind, LocalizedQuestion, ui};
use crate::i18n::I18nText;
use crate::language::{Language, TextDirection};
use crate::model::{PredictionResult, RiskLevel};
use crate::spec::{QuestionKind, QuestionSpec};
use crate::validate::InvalidAnswerInput;

/// Stateless projection of one question and its stored value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionView {
    Numeric {
        key: String,
        label: String,
        placeholder: String,
        value: Option<String>,
    },
    SingleChoice {
        key: String,
        label: String,
        prompt: String,
        options: Vec<OptionView>,
    },
}

impl QuestionView {
    pub fn key(&self) -> &str {
        match self {
            QuestionView::Numeric { key, .. } | QuestionView::SingleChoice { key, .. } => key,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            QuestionView::Numeric { label, .. } | QuestionView::SingleChoice { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub value: i64,
    pub label: String,
    pub selected: bool,
}

pub fn render_question(
    question: &LocalizedQuestion,
    value: Option<&AnswerValue>,
    select_prompt: &str,
) -> QuestionView {
    match &question.kind {
        LocalizedKind::Numeric { placeholder, .. } => QuestionView::Numeric {
            key: question.key.clone(),
            label: question.label.clone(),
            placeholder: placeholder.clone(),
            value: value.map(ToString::to_string),
        },
        LocalizedKind::SingleChoice { options } => {
            let selected = value.and_then(AnswerValue::as_int);
            QuestionView::SingleChoice {
                key: question.key.clone(),
                label: question.label.clone(),
                prompt: select_prompt.to_string(),
                options: options
                    .iter()
                    .map(|option| OptionView {
                        value: option.value,
                        label: option.label.clone(),
                        selected: selected == Some(option.value),
                    })
                    .collect(),
            }
        }
    }
}

/// Change notification from a numeric field. The raw text is forwarded unmodified.
pub fn text_changed(question: &QuestionSpec, raw: &str) -> Option<AnswerValue> {
    match question.kind {
        QuestionKind::Numeric { .. } => Some(AnswerValue::Text(raw.to_string())),
        QuestionKind::SingleChoice { .. } => None,
    }
}

/// Change notification from a choice field. Only listed option values are forwarded.
pub fn option_selected(question: &QuestionSpec, value: i64) -> Option<AnswerValue> {
    question
        .option_values()
        .contains(&value)
        .then_some(AnswerValue::Int(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Previous,
    Next,
    Submit,
    StartOver,
    Retry,
}

impl Action {
    fn label_key(self) -> &'static str {
        match self {
            Action::Previous => ui::PREVIOUS,
            Action::Next => ui::NEXT,
            Action::Submit => ui::SUBMIT,
            Action::StartOver => ui::START_OVER,
            Action::Retry => ui::RETRY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionView {
    pub action: Action,
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub current: usize,
    pub total: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub risk_level: RiskLevel,
    pub headline: String,
    pub probability_label: String,
    pub probability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoView {
    pub heading: String,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BodyView {
    Question {
        progress: ProgressView,
        question: QuestionView,
        error: Option<String>,
    },
    Pending {
        message: String,
    },
    Result(ResultView),
    Unavailable {
        message: String,
    },
}

/// Everything a frontend needs to draw the current screen in one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenView {
    pub language: Language,
    pub direction: TextDirection,
    pub title: String,
    pub description: String,
    pub tabs: Vec<String>,
    pub body: BodyView,
    pub info: InfoView,
    pub actions: Vec<ActionView>,
}

/// What the flow is currently showing.
#[derive(Debug, Clone, Copy)]
pub enum ScreenState<'a> {
    Question {
        step: usize,
        value: Option<&'a AnswerValue>,
        error: Option<&'a InvalidAnswerInput>,
    },
    Pending,
    Result(&'a PredictionResult),
    Unavailable,
}

pub fn build_screen(
    tables: &ContentTables,
    language: Language,
    state: ScreenState<'_>,
) -> ScreenView {
    let action = |action: Action, enabled: bool| ActionView {
        action,
        label: tables.message(language, action.label_key()),
        enabled,
    };
    let total = tables.question_count();

    let (body, actions) = match state {
        ScreenState::Question { step, value, error } => {
            let step = step.min(total.saturating_sub(1));
            let last = step + 1 >= total;
            let question = tables
                .question(language, step)
                .map(|question| {
                    render_question(
                        &question,
                        value,
                        &tables.message(language, ui::SELECT_PLACEHOLDER),
                    )
                })
                .unwrap_or_else(|| QuestionView::Numeric {
                    key: String::new(),
                    label: String::new(),
                    placeholder: String::new(),
                    value: None,
                });
            let body = BodyView::Question {
                progress: progress_view(tables, language, step),
                question,
                error: error.map(|error| error.message(tables, language)),
            };
            let forward = if last { Action::Submit } else { Action::Next };
            (body, vec![action(Action::Previous, step > 0), action(forward, true)])
        }
        ScreenState::Pending => (
            BodyView::Pending {
                message: tables.message(language, ui::RESULT_PENDING),
            },
            vec![
                action(Action::Previous, false),
                action(Action::Submit, false),
            ],
        ),
        ScreenState::Result(result) => (
            BodyView::Result(result_view(tables, language, result)),
            vec![action(Action::StartOver, true)],
        ),
        ScreenState::Unavailable => (
            BodyView::Unavailable {
                message: tables.message(language, ui::RESULT_UNAVAILABLE),
            },
            vec![action(Action::Retry, true), action(Action::StartOver, true)],
        ),
    };

    let form = tables.form();
    ScreenView {
        language,
        direction: language.direction(),
        title: tables.text(language, &form.title),
        description: tables.text(language, &form.description),
        tabs: vec![
            tables.message(language, ui::TAB_QUESTIONNAIRE),
            tables.message(language, ui::TAB_INFO),
        ],
        body,
        info: info_view(tables, language),
        actions,
    }
}

pub fn progress_view(tables: &ContentTables, language: Language, step: usize) -> ProgressView {
    let total = tables.question_count();
    let current = step + 1;
    let label = tables.text(
        language,
        &I18nText::new(ui::PROGRESS)
            .with_arg("current", current)
            .with_arg("total", total),
    );
    ProgressView {
        current,
        total,
        label,
    }
}

pub fn result_view(
    tables: &ContentTables,
    language: Language,
    result: &PredictionResult,
) -> ResultView {
    let headline = match result.risk_level {
        RiskLevel::Low => ui::RESULT_LOW,
        RiskLevel::High => ui::RESULT_HIGH,
    };
    ResultView {
        risk_level: result.risk_level,
        headline: tables.message(language, headline),
        probability_label: tables.message(language, ui::RESULT_PROBABILITY),
        probability: format!("{:.2}", result.probability),
    }
}

pub fn info_view(tables: &ContentTables, language: Language) -> InfoView {
    InfoView {
        heading: tables.message(language, ui::INFO_HEADING),
        tips: tables.tips(language),
    }
}

/// Plain-text rendering used by the interactive CLI.
pub fn render_text(screen: &ScreenView) -> String {
    let mut lines = vec![screen.title.clone(), screen.description.clone(), String::new()];
    match &screen.body {
        BodyView::Question {
            progress,
            question,
            error,
        } => {
            lines.push(progress.label.clone());
            lines.push(question.label().to_string());
            match question {
                QuestionView::Numeric {
                    placeholder, value, ..
                } => {
                    lines.push(format!("  ({placeholder})"));
                    if let Some(value) = value {
                        lines.push(format!("  = {value}"));
                    }
                }
                QuestionView::SingleChoice {
                    prompt, options, ..
                } => {
                    lines.push(format!("  {prompt}"));
                    for (idx, option) in options.iter().enumerate() {
                        let marker = if option.selected { "*" } else { " " };
                        lines.push(format!("{marker} {}) {}", idx + 1, option.label));
                    }
                }
            }
            if let Some(error) = error {
                lines.push(format!("! {error}"));
            }
        }
        BodyView::Pending { message } | BodyView::Unavailable { message } => {
            lines.push(message.clone());
        }
        BodyView::Result(result) => {
            lines.push(result.headline.clone());
            lines.push(format!("{} {}", result.probability_label, result.probability));
        }
    }

    let actions = screen
        .actions
        .iter()
        .filter(|action| action.enabled)
        .map(|action| format!("[{}]", action.label))
        .collect::<Vec<_>>();
    if !actions.is_empty() {
        lines.push(String::new());
        lines.push(actions.join(" "));
    }
    lines.join("\n")
}

pub fn render_tips_text(info: &InfoView) -> String {
    let mut lines = vec![info.heading.clone()];
    lines.extend(info.tips.iter().map(|tip| format!(" - {tip}")));
    lines.join("\n")
}

/// JSON rendering for frontends that draw their own widgets.
pub fn render_json_ui(screen: &ScreenView) -> Value {
    json!({
        "language": screen.language,
        "direction": screen.direction,
        "title": screen.title,
        "description": screen.description,
        "tabs": screen.tabs,
        "body": screen.body,
        "info": screen.info,
        "actions": screen.actions,
    })
}
