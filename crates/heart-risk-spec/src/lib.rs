#![allow(missing_docs)]

pub mod answers;
pub mod answers_schema;
pub mod content;
pub mod i18n;
pub mod language;
pub mod model;
pub mod render;
pub mod spec;
pub mod validate;

pub use answers::{AnswerSet, AnswerValue, Meta};
pub use answers_schema::generate as answers_schema;
pub use content::{
    ContentError, ContentTables, FORM_ID, FORM_VERSION, LocalizedKind, LocalizedOption,
    LocalizedQuestion, heart_risk_form, keys,
};
pub use i18n::{Catalog, I18nText};
pub use language::{Language, TextDirection, UnsupportedLanguage};
pub use model::{PredictionRequest, PredictionResult, RiskLevel, Sex, prediction_contract_schema};
pub use render::{
    Action, ActionView, BodyView, InfoView, QuestionView, ResultView, ScreenState, ScreenView,
    build_screen, option_selected, render_json_ui, render_question, render_text,
    render_tips_text, text_changed,
};
pub use spec::{ChoiceOption, FormSpec, NumericRange, QuestionKind, QuestionSpec};
pub use validate::{AnswerIssue, InvalidAnswerInput, build_request, validate, validate_answer};
