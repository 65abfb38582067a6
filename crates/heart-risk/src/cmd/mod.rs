pub mod i18n;
pub mod predict;
pub mod run;
pub mod schema;
pub mod tips;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use risk_flow::FlowController;
use risk_predictor::{PredictorSettings, build_client};
use risk_spec::{ContentTables, Language};
use tracing::debug;

/// Resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub language: Language,
    pub predictor: PredictorSettings,
}

impl Context {
    pub fn tables(&self) -> Result<Arc<ContentTables>> {
        let tables = ContentTables::builtin().context("built-in questionnaire content is invalid")?;
        Ok(Arc::new(tables))
    }

    pub fn controller(&self) -> Result<FlowController> {
        let predictor = build_client(&self.predictor).context("invalid predictor settings")?;
        debug!(backend = %self.predictor.backend, "predictor ready");
        Ok(
            FlowController::new(self.tables()?, predictor, self.predictor.timeout())
                .with_language(self.language),
        )
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
