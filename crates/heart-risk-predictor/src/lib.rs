#![allow(missing_docs)]

pub mod client;
pub mod error;
pub mod heuristic;
pub mod http;
pub mod settings;

pub use client::PredictionClient;
pub use error::PredictionUnavailable;
pub use heuristic::HeuristicPredictor;
pub use http::{HttpPredictionClient, parse_response};
pub use settings::{
    BackendKind, ModelDefaults, PredictorSettings, SettingsError, UnknownBackend, build_client,
};
