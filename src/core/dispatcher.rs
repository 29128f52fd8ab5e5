//! Routes requests to the provider matching their source language

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::config::{Backend, ServerConfig};
use crate::core::errors::{Result, TranslationError};
#[cfg(feature = "marian")]
use crate::core::marian::MarianProvider;
use crate::core::models::{Direction, SourceLanguage, TranslationRequest, TranslationResult};
use crate::core::provider::TranslationProvider;
use crate::core::remote::RemoteProvider;

fn load_provider(
    config: &ServerConfig,
    direction: Direction,
) -> Result<Arc<dyn TranslationProvider>> {
    match config.backend {
        Backend::Remote => Ok(Arc::new(RemoteProvider::new(direction, config)?)),
        #[cfg(feature = "marian")]
        Backend::Marian => Ok(Arc::new(MarianProvider::load(direction, config.use_gpu)?)),
        #[cfg(not(feature = "marian"))]
        Backend::Marian => Err(TranslationError::ConfigError {
            message: "built without the `marian` feature".to_string(),
        }),
    }
}

/// Translator holding one provider per direction
#[derive(Clone)]
pub struct Translator {
    en_ru: Arc<dyn TranslationProvider>,
    ru_en: Arc<dyn TranslationProvider>,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("en_ru", &self.en_ru.direction())
            .field("ru_en", &self.ru_en.direction())
            .finish()
    }
}

impl Translator {
    /// Create a translator from a provider pair
    pub fn new(
        en_ru: Arc<dyn TranslationProvider>,
        ru_en: Arc<dyn TranslationProvider>,
    ) -> Result<Self> {
        for (provider, expected) in [
            (&en_ru, Direction::EnglishToRussian),
            (&ru_en, Direction::RussianToEnglish),
        ] {
            if provider.direction() != expected {
                return Err(TranslationError::ConfigError {
                    message: format!(
                        "provider for {} reports direction {}",
                        expected,
                        provider.direction()
                    ),
                });
            }
        }

        Ok(Self { en_ru, ru_en })
    }

    /// Load both providers for the configured backend.
    ///
    /// Blocks until the models are ready; call from a blocking context.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        config.validate()?;
        info!("Loading {} providers", config.backend);

        let en_ru = load_provider(config, Direction::EnglishToRussian)?;
        let ru_en = load_provider(config, Direction::RussianToEnglish)?;

        Self::new(en_ru, ru_en)
    }

    fn provider(&self, lang: SourceLanguage) -> &Arc<dyn TranslationProvider> {
        match lang {
            SourceLanguage::En => &self.en_ru,
            SourceLanguage::Ru => &self.ru_en,
        }
    }

    /// Translate `text` written in `source_lang`
    pub async fn translate(&self, text: &str, source_lang: &str) -> Result<String> {
        let lang: SourceLanguage = source_lang.parse()?;
        let provider = self.provider(lang);

        debug!(
            "Translating {} chars with {} provider",
            text.chars().count(),
            provider.direction()
        );

        provider.translate(text).await.map_err(|e| {
            warn!("{} translation failed: {:#}", provider.direction(), e);
            TranslationError::TranslationFailure {
                message: e.to_string(),
            }
        })
    }

    /// Validate and translate a full request
    pub async fn translate_request(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult> {
        request.validate()?;
        let translated_text = self.translate(&request.text, &request.source_lang).await?;
        Ok(TranslationResult { translated_text })
    }
}
