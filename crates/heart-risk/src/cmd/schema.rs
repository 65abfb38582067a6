use anyhow::{Context as _, Result};
use risk_spec::{answers_schema, prediction_contract_schema};
use serde_json::json;

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let tables = ctx.tables()?;
    let document = json!({
        "answers": answers_schema(&tables, ctx.language),
        "prediction": prediction_contract_schema().context("failed to build prediction schema")?,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
