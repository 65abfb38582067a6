use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use risk_predictor::{PredictionClient, PredictionUnavailable};
use risk_spec::{PredictionRequest, PredictionResult};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Identifies one prediction request. A response is applied only while its
/// ticket is still the pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PredictionTicket {
    pub session: Uuid,
    pub generation: u64,
    pub sequence: u64,
}

impl fmt::Display for PredictionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.session, self.generation, self.sequence)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionCompletion {
    pub ticket: PredictionTicket,
    pub outcome: Result<PredictionResult, PredictionUnavailable>,
}

/// A submitted request, detached from the controller so it can run on any task.
///
/// The controller stays in its pending phase until the completion returned by
/// [`PredictionJob::run`] is applied, so a submitted job has to be run.
#[must_use = "the flow stays pending until the job is run and its completion applied"]
pub struct PredictionJob {
    pub(crate) ticket: PredictionTicket,
    pub(crate) request: PredictionRequest,
    pub(crate) predictor: Arc<dyn PredictionClient>,
    pub(crate) timeout: Duration,
    pub(crate) cancel: CancellationToken,
}

impl fmt::Debug for PredictionJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionJob")
            .field("ticket", &self.ticket)
            .field("request", &self.request)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PredictionJob {
    pub fn ticket(&self) -> PredictionTicket {
        self.ticket
    }

    pub fn request(&self) -> &PredictionRequest {
        &self.request
    }

    /// Calls the predictor, bounded by the timeout and the session's cancellation.
    pub async fn run(self) -> PredictionCompletion {
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PredictionUnavailable::Cancelled),
            outcome = tokio::time::timeout(self.timeout, self.predictor.predict(&self.request)) => {
                outcome
                    .unwrap_or(Err(PredictionUnavailable::Timeout { timeout_ms }))
                    .and_then(within_contract)
            }
        };
        debug!(ticket = %self.ticket, ok = outcome.is_ok(), "prediction finished");
        PredictionCompletion {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// Rejects results whose probability falls outside `[0.5, 1.0]`.
fn within_contract(result: PredictionResult) -> Result<PredictionResult, PredictionUnavailable> {
    PredictionResult::new(result.risk_level, result.probability).ok_or_else(|| {
        PredictionUnavailable::InvalidResponse(format!(
            "probability {} outside [{}, {}]",
            result.probability,
            PredictionResult::MIN_PROBABILITY,
            PredictionResult::MAX_PROBABILITY
        ))
    })
}
