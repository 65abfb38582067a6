use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use risk_flow::{FlowController, FlowError, FlowPhase};
use risk_spec::{
    AnswerValue, Language, LocalizedKind, QuestionKind, option_selected, render_text,
    render_tips_text, text_changed,
};

use super::Context;
use super::i18n::{tr, trf};

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Write the collected answers as JSON when the session ends
    #[arg(long, value_name = "PATH")]
    pub answers_out: Option<PathBuf>,
}

pub fn run(args: RunArgs, ctx: &Context) -> Result<()> {
    let mut flow = ctx.controller()?;
    let runtime = super::runtime()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    writeln!(out, "{}", tr(ctx.language, "cli.run.help"))?;
    runtime.block_on(drive(&mut flow, &mut input, &mut out))?;

    if let Some(path) = args.answers_out {
        let json = flow.answers().to_json_pretty()?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        writeln!(
            out,
            "{}",
            trf(flow.language(), "cli.run.saved", &[&path.display().to_string()])
        )?;
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Answer(&'a str),
    Back,
    Lang(&'a str),
    Tips,
    Reset,
    Retry,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Input::Answer(trimmed);
    };
    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map(|(name, arg)| (name, arg.trim()))
        .unwrap_or((rest, ""));
    match name {
        "back" | "b" => Input::Back,
        "lang" | "l" => Input::Lang(arg),
        "tips" | "t" => Input::Tips,
        "reset" => Input::Reset,
        "retry" | "r" => Input::Retry,
        "help" | "h" => Input::Help,
        "quit" | "q" => Input::Quit,
        _ => Input::Unknown(name),
    }
}

/// Reads lines until `:quit` or end of input, redrawing the screen after each change.
pub async fn drive<R: BufRead, W: Write>(
    flow: &mut FlowController,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let mut redraw = true;
    loop {
        if redraw {
            writeln!(out, "\n{}", render_text(&flow.screen()))?;
        }
        redraw = true;
        let language = flow.language();
        write!(out, "{} ", tr(language, "cli.run.prompt"))?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match parse_input(&line) {
            Input::Answer(text) => answer(flow, text, out).await?,
            Input::Back => {
                if flow.retreat().is_err() {
                    writeln!(out, "{}", tr(language, "cli.run.locked"))?;
                }
            }
            Input::Lang(raw) => match raw.parse::<Language>() {
                Ok(next) => {
                    flow.set_language(next);
                }
                Err(_) => {
                    writeln!(out, "{}", trf(language, "cli.run.unknown_language", &[raw]))?;
                    redraw = false;
                }
            },
            Input::Tips => {
                writeln!(out, "{}", render_tips_text(&flow.screen().info))?;
                redraw = false;
            }
            Input::Reset => flow.reset(),
            Input::Retry => match flow.retry_and_resolve().await.map(|_| ()) {
                Ok(()) => {}
                Err(FlowError::NotRetryable) => {
                    writeln!(out, "{}", tr(language, "cli.run.not_retryable"))?;
                    redraw = false;
                }
                Err(err) => writeln!(out, "{err}")?,
            },
            Input::Help => {
                writeln!(out, "{}", tr(language, "cli.run.help"))?;
                redraw = false;
            }
            Input::Quit => break,
            Input::Unknown(name) => {
                writeln!(out, "{}", trf(language, "cli.run.unknown_command", &[name]))?;
                redraw = false;
            }
        }
    }
    writeln!(out, "{}", tr(flow.language(), "cli.run.bye"))?;
    Ok(())
}

async fn answer<W: Write>(flow: &mut FlowController, text: &str, out: &mut W) -> Result<()> {
    let language = flow.language();
    match flow.phase() {
        FlowPhase::Questioning => {}
        FlowPhase::Unavailable(_) => {
            writeln!(out, "{}", tr(language, "cli.run.unavailable_hint"))?;
            return Ok(());
        }
        _ => {
            writeln!(out, "{}", tr(language, "cli.run.finished_hint"))?;
            return Ok(());
        }
    }

    let Some(value) = answer_value(flow, text) else {
        writeln!(out, "{}", tr(language, "cli.run.invalid_choice"))?;
        writeln!(out, "{}", tr(language, "cli.run.choice_hint"))?;
        return Ok(());
    };
    flow.answer_current(value)?;

    // Invalid answers are shown on the redrawn question.
    match flow.advance_and_resolve().await.map(|_| ()) {
        Ok(()) | Err(FlowError::InvalidAnswer(_)) => Ok(()),
        Err(err) => {
            writeln!(out, "{err}")?;
            Ok(())
        }
    }
}

/// Numeric text is forwarded as typed. A choice accepts its list number or its label.
fn answer_value(flow: &FlowController, text: &str) -> Option<AnswerValue> {
    let question = flow.current_question()?;
    match question.kind {
        QuestionKind::Numeric { .. } => text_changed(question, text),
        QuestionKind::SingleChoice { .. } => {
            let localized = flow.tables().question(flow.language(), flow.step())?;
            let LocalizedKind::SingleChoice { options } = localized.kind else {
                return None;
            };
            let wanted = text.to_lowercase();
            let chosen = AnswerValue::from(text)
                .as_int()
                .and_then(|n| usize::try_from(n).ok())
                .filter(|n| (1..=options.len()).contains(n))
                .map(|n| options[n - 1].value)
                .or_else(|| {
                    options
                        .iter()
                        .find(|option| option.label.to_lowercase() == wanted)
                        .map(|option| option.value)
                })?;
            option_selected(question, chosen)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use risk_predictor::PredictorSettings;
    use risk_spec::keys;

    use super::*;

    fn context(language: Language) -> Context {
        Context {
            language,
            predictor: PredictorSettings {
                simulated_delay_ms: 0,
                ..PredictorSettings::default()
            },
        }
    }

    fn session(language: Language, script: &str) -> (FlowController, String) {
        let mut flow = context(language).controller().expect("controller");
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let runtime = super::super::runtime().expect("runtime");
        runtime
            .block_on(drive(&mut flow, &mut input, &mut out))
            .expect("drive");
        (flow, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn parses_commands_and_answers() {
        assert_eq!(parse_input(" 45 \n"), Input::Answer("45"));
        assert_eq!(parse_input(":lang ar\n"), Input::Lang("ar"));
        assert_eq!(parse_input(":back"), Input::Back);
        assert_eq!(parse_input(":frobnicate"), Input::Unknown("frobnicate"));
    }

    #[test]
    fn full_session_reaches_a_result() {
        let (flow, output) = session(Language::En, "45\n1\nyes\n1\n1\n3\n");
        assert!(flow.prediction().is_some());
        assert!(output.contains("Probability:"));
        assert_eq!(flow.answers().get(keys::SEX), Some(&AnswerValue::Int(0)));
        assert_eq!(flow.answers().get(keys::DIABETES), Some(&AnswerValue::Int(1)));
        assert_eq!(flow.answers().get(keys::AGE), Some(&AnswerValue::from("45")));
    }

    #[test]
    fn arabic_digits_answer_numbers_and_list_choices() {
        let (flow, _) = session(Language::Ar, "٤٥\n٢\n");
        assert_eq!(flow.step(), 2);
        assert_eq!(flow.answers().get(keys::AGE), Some(&AnswerValue::from("٤٥")));
        assert_eq!(flow.answers().get(keys::SEX), Some(&AnswerValue::Int(1)));
    }

    #[test]
    fn invalid_number_is_reported_and_step_kept() {
        let (flow, output) = session(Language::En, "abc\n");
        assert_eq!(flow.step(), 0);
        assert!(output.contains("Please enter a whole number."));
    }

    #[test]
    fn language_switch_mid_flow_keeps_answers() {
        let (flow, output) = session(Language::En, "50\n1\n2\n:lang ar\n:back\n");
        assert_eq!(flow.language(), Language::Ar);
        assert_eq!(flow.step(), 2);
        assert_eq!(flow.answers().get(keys::AGE), Some(&AnswerValue::from("50")));
        assert!(output.contains("السؤال 4 من 6"));
        assert!(output.contains("مع السلامة."));
    }

    #[test]
    fn unknown_choice_is_rejected_without_recording() {
        let (flow, output) = session(Language::En, "45\n7\n");
        assert_eq!(flow.step(), 1);
        assert!(flow.answers().get(keys::SEX).is_none());
        assert!(output.contains("Please choose one of the listed options."));
    }
}
