//! Language model provider interface

use async_trait::async_trait;

use crate::core::models::Direction;

/// A capability translating text in one fixed direction.
///
/// Implementations encapsulate tokenization, generation and decoding.
/// They are shared across in-flight requests and must tolerate concurrent
/// calls, either by being re-entrant or by serializing internally.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Direction this provider serves
    fn direction(&self) -> Direction;

    /// Translate `text` into the target language.
    ///
    /// The returned error message is passed through to the client.
    async fn translate(&self, text: &str) -> anyhow::Result<String>;
}
