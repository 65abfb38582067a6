//! Typed prediction contract shared by the flow controller and predictors.

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Option value used by the form and by the model.
    pub fn code(self) -> i64 {
        match self {
            Sex::Male => 0,
            Sex::Female => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Sex::Male),
            1 => Some(Sex::Female),
            _ => None,
        }
    }
}

/// The six risk factors sent to a predictor, already validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionRequest {
    pub age: u16,
    pub sex: Sex,
    pub diabetes: bool,
    pub family_history: bool,
    pub smoking: bool,
    pub physical_activity_days: u8,
}

/// Outcome of a prediction. `probability` is the confidence in `risk_level`
/// and always lies in `[0.5, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResult {
    pub risk_level: RiskLevel,
    pub probability: f64,
}

impl PredictionResult {
    pub const MIN_PROBABILITY: f64 = 0.5;
    pub const MAX_PROBABILITY: f64 = 1.0;

    /// Returns `None` when `probability` falls outside `[0.5, 1.0]`.
    pub fn new(risk_level: RiskLevel, probability: f64) -> Option<Self> {
        if (Self::MIN_PROBABILITY..=Self::MAX_PROBABILITY).contains(&probability) {
            Some(Self {
                risk_level,
                probability,
            })
        } else {
            None
        }
    }
}

/// JSON schemas for both halves of the prediction contract.
pub fn prediction_contract_schema() -> Result<Value, serde_json::Error> {
    Ok(json!({
        "request": serde_json::to_value(schema_for!(PredictionRequest))?,
        "result": serde_json::to_value(schema_for!(PredictionResult))?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_outside_contract_is_rejected() {
        assert!(PredictionResult::new(RiskLevel::Low, 0.49).is_none());
        assert!(PredictionResult::new(RiskLevel::High, 1.01).is_none());
        assert!(PredictionResult::new(RiskLevel::High, f64::NAN).is_none());
        assert!(PredictionResult::new(RiskLevel::High, 0.5).is_some());
        assert!(PredictionResult::new(RiskLevel::Low, 1.0).is_some());
    }

    #[test]
    fn sex_codes_match_option_values() {
        assert_eq!(Sex::from_code(0), Some(Sex::Male));
        assert_eq!(Sex::from_code(1), Some(Sex::Female));
        assert_eq!(Sex::from_code(2), None);
        assert_eq!(Sex::Female.code(), 1);
    }

    #[test]
    fn contract_schema_names_both_sides() {
        let schema = prediction_contract_schema().expect("schema");
        let request = schema["request"].to_string();
        assert!(request.contains("physical_activity_days"));
        assert!(schema["result"].to_string().contains("risk_level"));
    }
}
