#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use risk_flow::{Advance, FlowController};
use risk_predictor::{PredictionClient, PredictionUnavailable};
use risk_spec::{
    AnswerValue, ContentTables, PredictionRequest, PredictionResult, RiskLevel, keys,
};

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Answers a fixed result after `delay`, counting calls.
pub struct ScriptedPredictor {
    pub delay: Duration,
    pub outcome: Result<PredictionResult, PredictionUnavailable>,
    pub calls: AtomicUsize,
}

impl ScriptedPredictor {
    pub fn ok(risk_level: RiskLevel, probability: f64) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(PredictionResult {
                risk_level,
                probability,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: PredictionUnavailable) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionClient for ScriptedPredictor {
    async fn predict(
        &self,
        _request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}

pub fn tables() -> Arc<ContentTables> {
    Arc::new(ContentTables::builtin().expect("content"))
}

pub fn controller(predictor: Arc<dyn PredictionClient>) -> FlowController {
    FlowController::new(tables(), predictor, TIMEOUT)
}

/// Age=45, Sex=Male, Diabetes=Yes, FamilyHistory=No, Smoking=No, PhysicalActivity=3.
pub fn scenario() -> Vec<(&'static str, AnswerValue)> {
    vec![
        (keys::AGE, AnswerValue::from("45")),
        (keys::SEX, AnswerValue::Int(0)),
        (keys::DIABETES, AnswerValue::Int(1)),
        (keys::FAMILY_HISTORY, AnswerValue::Int(0)),
        (keys::SMOKING, AnswerValue::Int(0)),
        (keys::PHYSICAL_ACTIVITY, AnswerValue::from("3")),
    ]
}

/// Answers and advances through every question except the last advance.
pub fn fill_to_last(flow: &mut FlowController) {
    let answers = scenario();
    let (last, rest) = answers.split_last().expect("questions");
    for (key, value) in rest {
        flow.record_answer(key, value.clone()).expect("record");
        assert!(matches!(flow.advance(), Ok(Advance::Moved { .. })));
    }
    flow.record_answer(last.0, last.1.clone()).expect("record last");
}
