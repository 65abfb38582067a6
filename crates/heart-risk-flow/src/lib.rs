#![allow(missing_docs)]

mod controller;
mod error;
mod job;

pub use controller::{Advance, FlowController, FlowPhase};
pub use error::FlowError;
pub use job::{PredictionCompletion, PredictionJob, PredictionTicket};
