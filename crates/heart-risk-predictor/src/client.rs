use async_trait::async_trait;
use risk_spec::{PredictionRequest, PredictionResult};

use crate::error::PredictionUnavailable;

/// Replaceable prediction collaborator.
///
/// Implementations do not need to enforce the session timeout themselves;
/// callers bound every call and may drop the future on cancellation.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionUnavailable>;
}
