use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use risk_predictor::BackendKind;
use tracing_subscriber::EnvFilter;

use crate::cmd::{self, Context, predict::PredictArgs, run::RunArgs};
use crate::config::{AppConfig, PredictorOverrides};

#[derive(Parser, Debug)]
#[command(
    name = "heart-risk",
    about = "Bilingual questionnaire that estimates heart-attack risk",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Display language (en or ar); defaults to the config file, then the system locale
    #[arg(long = "locale", value_name = "LOCALE", global = true)]
    locale: Option<String>,

    /// Config file (defaults to config.toml in the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Prediction backend
    #[arg(long, value_name = "heuristic|http", global = true)]
    predictor: Option<BackendKind>,

    /// Model service URL used by the http backend
    #[arg(long, value_name = "URL", global = true)]
    endpoint: Option<String>,

    /// Upper bound on a single prediction
    #[arg(long, value_name = "MS", global = true)]
    timeout_ms: Option<u64>,

    /// Artificial latency of the heuristic backend
    #[arg(long, value_name = "MS", global = true)]
    simulated_delay_ms: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer the questionnaire interactively
    Run(RunArgs),
    /// Predict from an answers file without prompting
    Predict(PredictArgs),
    /// Print the health tips
    Tips,
    /// Print the JSON schemas of the answers file and the prediction contract
    Schema,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref())?;
    let language = cmd::i18n::select_language(cli.locale.as_deref(), config.locale.as_deref());
    let overrides = PredictorOverrides {
        backend: cli.predictor,
        endpoint: cli.endpoint,
        timeout_ms: cli.timeout_ms,
        simulated_delay_ms: cli.simulated_delay_ms,
    };
    let ctx = Context {
        language,
        predictor: overrides.apply(config.predictor),
    };
    tracing::debug!(%language, backend = %ctx.predictor.backend, "starting");

    match cli.command {
        Commands::Run(args) => cmd::run::run(args, &ctx),
        Commands::Predict(args) => cmd::predict::run(args, &ctx),
        Commands::Tips => cmd::tips::run(&ctx),
        Commands::Schema => cmd::schema::run(&ctx),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
