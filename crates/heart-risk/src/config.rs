use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use risk_predictor::{BackendKind, PredictorSettings};
use serde::{Deserialize, Serialize};

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub locale: Option<String>,
    pub predictor: PredictorSettings,
}

impl AppConfig {
    /// `<config_dir>/config.toml` for this application, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "heart-risk", "heart-risk")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reads `explicit` when given. Otherwise reads the default file if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }
}

/// Predictor settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct PredictorOverrides {
    pub backend: Option<BackendKind>,
    pub endpoint: Option<String>,
    pub timeout_ms: Option<u64>,
    pub simulated_delay_ms: Option<u64>,
}

impl PredictorOverrides {
    pub fn apply(self, mut settings: PredictorSettings) -> PredictorSettings {
        if let Some(backend) = self.backend {
            settings.backend = backend;
        }
        if let Some(endpoint) = self.endpoint {
            settings.endpoint = endpoint;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            settings.timeout_ms = timeout_ms;
        }
        if let Some(delay) = self.simulated_delay_ms {
            settings.simulated_delay_ms = delay;
        }
        settings
    }
}
