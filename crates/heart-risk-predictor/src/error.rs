use thiserror::Error;

/// The prediction collaborator failed or did not answer in time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionUnavailable {
    #[error("prediction timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("prediction was cancelled")]
    Cancelled,
    #[error("prediction service unreachable: {0}")]
    Transport(String),
    #[error("prediction service rejected the request: {0}")]
    Rejected(String),
    #[error("prediction service returned an invalid response: {0}")]
    InvalidResponse(String),
}
