use risk_spec::InvalidAnswerInput;
use thiserror::Error;

use crate::job::PredictionTicket;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error(transparent)]
    InvalidAnswer(#[from] InvalidAnswerInput),
    #[error("question navigation is locked while {phase}")]
    NavigationLocked { phase: &'static str },
    #[error("unknown question `{0}`")]
    UnknownQuestion(String),
    #[error("discarded stale prediction response for {ticket}")]
    StaleResponse { ticket: PredictionTicket },
    #[error("there is no failed prediction to retry")]
    NotRetryable,
}
