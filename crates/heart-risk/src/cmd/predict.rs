use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::Args;
use risk_flow::{FlowController, FlowError, FlowPhase};
use risk_spec::render::result_view;
use risk_spec::{AnswerSet, AnswerValue};
use serde_json::{Value, json};

use super::Context;
use super::i18n::trf;

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Answers JSON: a flat `{"Age": 45, ...}` object or a saved answer set
    #[arg(long, value_name = "PATH")]
    pub answers: PathBuf,
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PredictArgs, ctx: &Context) -> Result<()> {
    let raw = fs::read_to_string(&args.answers)
        .with_context(|| format!("failed to read {}", args.answers.display()))?;
    let answers = parse_answers(&raw)
        .with_context(|| format!("invalid answers file {}", args.answers.display()))?;

    let mut flow = ctx.controller()?;
    for (key, value) in answers {
        flow.record_answer(&key, value)?;
    }

    let runtime = super::runtime()?;
    runtime.block_on(complete(&mut flow, ctx))?;

    match flow.phase() {
        FlowPhase::ShowingResult(result) => {
            if args.json {
                let document = json!({
                    "risk_level": result.risk_level,
                    "probability": result.probability,
                });
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                let view = result_view(flow.tables(), ctx.language, result);
                println!("{}", view.headline);
                println!("{} {}", view.probability_label, view.probability);
            }
            Ok(())
        }
        FlowPhase::Unavailable(err) => bail!(trf(
            ctx.language,
            "cli.predict.unavailable",
            &[&err.to_string()]
        )),
        _ => bail!(trf(ctx.language, "cli.predict.incomplete", &[])),
    }
}

/// Advances through every question, validating each stored answer on the way.
async fn complete(flow: &mut FlowController, ctx: &Context) -> Result<()> {
    while matches!(flow.phase(), FlowPhase::Questioning) {
        match flow.advance_and_resolve().await.map(|_| ()) {
            Ok(()) => {}
            Err(FlowError::InvalidAnswer(issue)) => {
                let message = issue.message(flow.tables(), ctx.language);
                bail!(trf(ctx.language, "cli.predict.invalid", &[&issue.key, &message]));
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn parse_answers(raw: &str) -> Result<BTreeMap<String, AnswerValue>> {
    let value: Value = serde_json::from_str(raw)?;
    if value.get("form_id").is_some() && value.get("answers").is_some() {
        let set: AnswerSet = serde_json::from_value(value)?;
        return Ok(set.answers);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_flat_and_saved_answer_documents() {
        let flat = parse_answers(r#"{"Age": "45", "Sex": 0}"#).expect("flat");
        assert_eq!(flat.get("Age"), Some(&AnswerValue::Text("45".into())));

        let saved = parse_answers(
            r#"{"form_id": "heart-risk", "spec_version": "1.0.0", "answers": {"Sex": 1}}"#,
        )
        .expect("saved");
        assert_eq!(saved.get("Sex"), Some(&AnswerValue::Int(1)));
    }

    #[test]
    fn rejects_non_scalar_answers() {
        assert!(parse_answers(r#"{"Age": [45]}"#).is_err());
        assert!(parse_answers("not json").is_err());
    }
}
