//! Client for the `/predict` model service.
//!
//! The service takes the answers as query parameters with French names and
//! answers with French labels:
//! `{"Risque prédit": "Faible risque de crise cardiaque", "Probabilité": "0.87"}`
//! or `{"erreur": "..."}`. English keys (`Risk`, `Probability`) are accepted too.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use risk_spec::{PredictionRequest, PredictionResult, RiskLevel};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::client::PredictionClient;
use crate::error::PredictionUnavailable;
use crate::settings::ModelDefaults;

const RISK_FIELDS: &[&str] = &["Risque prédit", "Risk"];
const PROBABILITY_FIELDS: &[&str] = &["Probabilité", "Probability"];
const ERROR_FIELDS: &[&str] = &["erreur", "error"];

#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    client: Client,
    endpoint: Url,
    defaults: ModelDefaults,
    timeout_ms: u64,
}

impl HttpPredictionClient {
    pub fn new(
        endpoint: Url,
        defaults: ModelDefaults,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            defaults,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for `request`, with the model-only fields taken from the defaults.
    pub fn request_url(&self, request: &PredictionRequest) -> Url {
        let flag = |set: bool| if set { "1" } else { "0" };
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("Age", &request.age.to_string())
            .append_pair("Sexe", &request.sex.code().to_string())
            .append_pair("Diabete", flag(request.diabetes))
            .append_pair("Antecedents_Familiaux", flag(request.family_history))
            .append_pair("Tabagisme", flag(request.smoking))
            .append_pair("Obesite", flag(self.defaults.obesity))
            .append_pair(
                "Heures_Sommeil_Par_Jour",
                &self.defaults.sleep_hours_per_day.to_string(),
            )
            .append_pair(
                "Jours_Activite_Physique_Par_Semaine",
                &request.physical_activity_days.to_string(),
            )
            .append_pair(
                "Problemes_Cardiaques_Precedents",
                flag(self.defaults.previous_heart_problems),
            )
            .append_pair("Utilisation_Medicaments", flag(self.defaults.medication_use));
        url
    }

    fn transport_error(&self, err: reqwest::Error) -> PredictionUnavailable {
        if err.is_timeout() {
            PredictionUnavailable::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            PredictionUnavailable::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionUnavailable> {
        let url = self.request_url(request);
        debug!(endpoint = %self.endpoint, "requesting prediction");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "prediction service returned an error status");
            return Err(PredictionUnavailable::Rejected(format!("HTTP {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| PredictionUnavailable::InvalidResponse(err.to_string()))?;
        parse_response(&body)
    }
}

fn field<'a>(body: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| body.get(*name))
}

/// Maps a service response body onto the prediction contract.
pub fn parse_response(body: &Value) -> Result<PredictionResult, PredictionUnavailable> {
    if let Some(message) = field(body, ERROR_FIELDS) {
        let message = message
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| message.to_string());
        return Err(PredictionUnavailable::Rejected(message));
    }

    let label = field(body, RISK_FIELDS)
        .and_then(Value::as_str)
        .ok_or_else(|| PredictionUnavailable::InvalidResponse("missing risk label".into()))?;
    let risk_level = parse_risk_label(label).ok_or_else(|| {
        PredictionUnavailable::InvalidResponse(format!("unrecognised risk label `{label}`"))
    })?;

    let probability = match field(body, PROBABILITY_FIELDS) {
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        Some(Value::Number(number)) => number.as_f64(),
        _ => None,
    }
    .ok_or_else(|| PredictionUnavailable::InvalidResponse("missing probability".into()))?;

    PredictionResult::new(risk_level, probability).ok_or_else(|| {
        PredictionUnavailable::InvalidResponse(format!(
            "probability {probability} outside [0.5, 1.0]"
        ))
    })
}

fn parse_risk_label(label: &str) -> Option<RiskLevel> {
    let label = label.to_lowercase();
    if label.contains("faible") || label.contains("low") {
        Some(RiskLevel::Low)
    } else if label.contains("élevé") || label.contains("eleve") || label.contains("high") {
        Some(RiskLevel::High)
    } else {
        None
    }
}
