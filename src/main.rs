//! Main entry point for the enru-translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use enru_translator::cli::commands::{self, Commands};
use enru_translator::ServerConfig;

/// English <-> Russian translation service
#[derive(Parser, Debug)]
#[command(name = "enru-translator", version, about, long_about = None)]
struct Args {
    /// JSON configuration file; environment variables override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("enru_translator={},tower_http={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?.merge_lookup(|key| std::env::var(key).ok())?,
        None => ServerConfig::from_env()?,
    };

    match args.command {
        Some(Commands::Server {
            host,
            port,
            origin,
            backend,
        }) => {
            commands::handle_server(config, host, port, origin, backend).await?;
        }
        Some(Commands::Translate {
            text,
            source_lang,
            backend,
        }) => {
            commands::handle_translate(config, text, source_lang, backend).await?;
        }
        None => {
            commands::handle_server(config, None, None, None, None).await?;
        }
    }

    Ok(())
}
