//! CLI command definitions and handlers

use clap::Subcommand;
use tracing::info;

use crate::core::config::{Backend, ServerConfig};
use crate::core::dispatcher::Translator;
use crate::core::models::TranslationRequest;

/// Commands for the translation service
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP API server
    Server {
        /// Bind address (default: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (default: 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Allowed cross-origin origin (default: http://localhost:3000)
        #[arg(long)]
        origin: Option<String>,

        /// Inference backend: marian or remote
        #[arg(long)]
        backend: Option<Backend>,
    },

    /// Translate a single text and print the result
    Translate {
        /// Text to translate
        #[arg(short, long)]
        text: String,

        /// Source language: en or ru
        #[arg(short, long, default_value = "en")]
        source_lang: String,

        /// Inference backend: marian or remote
        #[arg(long)]
        backend: Option<Backend>,
    },
}

/// Handle server command
pub async fn handle_server(
    mut config: ServerConfig,
    host: Option<String>,
    port: Option<u16>,
    origin: Option<String>,
    backend: Option<Backend>,
) -> anyhow::Result<()> {
    use crate::server::api::run_server;

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(origin) = origin {
        config.allowed_origin = origin;
    }
    if let Some(backend) = backend {
        config.backend = backend;
    }

    info!("Starting HTTP server on {} ({} backend)", config.bind_addr(), config.backend);
    println!("🚀 Server starting on http://{}", config.bind_addr());

    run_server(config).await
}

/// Handle translate command
pub async fn handle_translate(
    mut config: ServerConfig,
    text: String,
    source_lang: String,
    backend: Option<Backend>,
) -> anyhow::Result<()> {
    if let Some(backend) = backend {
        config.backend = backend;
    }

    let request = TranslationRequest::new(text, source_lang);
    request.validate()?;

    let translator = tokio::task::spawn_blocking(move || Translator::from_config(&config)).await??;
    let result = translator.translate_request(&request).await?;

    println!("{}", result.translated_text);

    Ok(())
}
