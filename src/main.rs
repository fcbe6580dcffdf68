use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ai_trivia::{Difficulty, LlmProvider, Settings, Trivia};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Trivia game with questions written by a language model
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with generation service settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generation service provider (overrides the settings file)
    #[arg(long, value_enum)]
    provider: Option<LlmProvider>,

    /// Model name (overrides the settings file)
    #[arg(short, long)]
    model: Option<String>,

    /// Topic to pre-select on the setup screen
    #[arg(short, long)]
    topic: Option<String>,

    /// Difficulty to pre-select on the setup screen
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Number of questions to pre-select (3-10)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u8).range(3..=10))]
    count: Option<u8>,

    /// Where to write logs while the terminal UI is running
    #[arg(long, default_value = "trivia.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_file)?;

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(provider) = args.provider {
        settings.provider = provider;
    }
    if let Some(model) = args.model {
        settings.model = Some(model);
    }
    info!(provider = ?settings.provider, model = %settings.model(), "Starting trivia");

    let trivia = Trivia::from_settings(&settings)?.with_setup(
        args.topic.as_deref(),
        args.difficulty,
        args.count.map(usize::from),
    );
    trivia.run().await?;

    Ok(())
}

/// Logs go to a file because the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
