// ABOUTME: Entry point for calgate — a calendar assistant that asks before risky tool calls.
// ABOUTME: Parses CLI args, loads config, initializes logging, and launches the app.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use calgate::app::App;
use calgate::config::{Config, Overrides};

#[derive(Parser, Debug)]
#[command(name = "calgate")]
#[command(about = "Google Calendar assistant with tool confirmation", long_about = None)]
struct Cli {
    /// Config file (default: ~/.calgate/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arcade user id the tools act for
    #[arg(long)]
    user_id: Option<String>,

    /// Chat model name
    #[arg(long)]
    model: Option<String>,

    /// Toolkit to load (repeatable)
    #[arg(long = "toolkit")]
    toolkits: Vec<String>,

    /// Tool name or glob that needs confirmation (repeatable)
    #[arg(long = "confirm")]
    confirm: Vec<String>,

    /// Run every tool without asking
    #[arg(long)]
    no_confirm: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();
    config.apply_overrides(Overrides {
        user_id: cli.user_id,
        model: cli.model,
        toolkits: cli.toolkits,
        confirm: cli.confirm,
        no_confirm: cli.no_confirm,
    });

    App::new(config).run().await
}
