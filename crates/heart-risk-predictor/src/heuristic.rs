//! Offline predictor used when no model service is configured.

use std::time::Duration;

use async_trait::async_trait;
use risk_spec::{PredictionRequest, PredictionResult, RiskLevel, Sex};
use tracing::debug;

use crate::client::PredictionClient;
use crate::error::PredictionUnavailable;

const INTERCEPT: f64 = -5.5;
const AGE_WEIGHT: f64 = 0.06;
const MALE_WEIGHT: f64 = 0.4;
const DIABETES_WEIGHT: f64 = 0.8;
const FAMILY_HISTORY_WEIGHT: f64 = 0.6;
const SMOKING_WEIGHT: f64 = 0.9;
const ACTIVITY_DAY_WEIGHT: f64 = -0.15;

/// Deterministic logistic score over the six questionnaire answers.
///
/// The optional delay stands in for a network round trip.
#[derive(Debug, Clone, Default)]
pub struct HeuristicPredictor {
    delay: Duration,
}

impl HeuristicPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Probability of the high-risk class.
    pub fn score(request: &PredictionRequest) -> f64 {
        let flag = |set: bool, weight: f64| if set { weight } else { 0.0 };
        let z = INTERCEPT
            + AGE_WEIGHT * f64::from(request.age)
            + flag(request.sex == Sex::Male, MALE_WEIGHT)
            + flag(request.diabetes, DIABETES_WEIGHT)
            + flag(request.family_history, FAMILY_HISTORY_WEIGHT)
            + flag(request.smoking, SMOKING_WEIGHT)
            + ACTIVITY_DAY_WEIGHT * f64::from(request.physical_activity_days);
        sigmoid(z)
    }

    pub fn classify(request: &PredictionRequest) -> Result<PredictionResult, PredictionUnavailable> {
        let high = Self::score(request);
        let (risk_level, confidence) = if high >= 0.5 {
            (RiskLevel::High, high)
        } else {
            (RiskLevel::Low, 1.0 - high)
        };
        let probability = (confidence * 100.0).round() / 100.0;
        PredictionResult::new(risk_level, probability).ok_or_else(|| {
            PredictionUnavailable::InvalidResponse(format!("probability {probability} out of range"))
        })
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[async_trait]
impl PredictionClient for HeuristicPredictor {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionUnavailable> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = Self::classify(request)?;
        debug!(risk = ?result.risk_level, probability = result.probability, "heuristic prediction");
        Ok(result)
    }
}
