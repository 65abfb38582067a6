use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::client::PredictionClient;
use crate::heuristic::HeuristicPredictor;
use crate::http::HttpPredictionClient;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SIMULATED_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Heuristic,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown predictor backend `{0}` (expected `heuristic` or `http`)")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(BackendKind::Heuristic),
            "http" => Ok(BackendKind::Http),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Heuristic => "heuristic",
            BackendKind::Http => "http",
        })
    }
}

/// Model inputs the questionnaire does not ask for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDefaults {
    pub obesity: bool,
    pub sleep_hours_per_day: f64,
    pub previous_heart_problems: bool,
    pub medication_use: bool,
}

impl Default for ModelDefaults {
    fn default() -> Self {
        Self {
            obesity: false,
            sleep_hours_per_day: 7.0,
            previous_heart_problems: false,
            medication_use: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorSettings {
    pub backend: BackendKind,
    pub endpoint: String,
    pub timeout_ms: u64,
    pub simulated_delay_ms: u64,
    pub model_defaults: ModelDefaults,
}

impl Default for PredictorSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            simulated_delay_ms: DEFAULT_SIMULATED_DELAY_MS,
            model_defaults: ModelDefaults::default(),
        }
    }
}

impl PredictorSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    pub fn endpoint_url(&self) -> Result<Url, SettingsError> {
        let url = Url::parse(&self.endpoint).map_err(|source| SettingsError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SettingsError::UnsupportedScheme(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("prediction timeout must be greater than zero")]
    ZeroTimeout,
    #[error("invalid prediction endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported endpoint scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Builds the configured prediction collaborator.
pub fn build_client(
    settings: &PredictorSettings,
) -> Result<Arc<dyn PredictionClient>, SettingsError> {
    if settings.timeout_ms == 0 {
        return Err(SettingsError::ZeroTimeout);
    }
    match settings.backend {
        BackendKind::Heuristic => Ok(Arc::new(
            HeuristicPredictor::new().with_delay(settings.simulated_delay()),
        )),
        BackendKind::Http => {
            let client = HttpPredictionClient::new(
                settings.endpoint_url()?,
                settings.model_defaults,
                settings.timeout(),
            )?;
            Ok(Arc::new(client))
        }
    }
}
