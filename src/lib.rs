//! English <-> Russian translation service
//!
//! This library wraps two pretrained translation providers, one per
//! direction, behind a single `POST /translate` HTTP endpoint.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use core::{
    config::{Backend, ServerConfig},
    dispatcher::Translator,
    errors::TranslationError,
    models::{Direction, SourceLanguage, TranslationRequest, TranslationResult},
    provider::TranslationProvider,
    remote::RemoteProvider,
};

#[cfg(feature = "marian")]
pub use core::marian::MarianProvider;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
