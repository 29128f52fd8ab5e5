//! Local Marian models served through rust-bert

use async_trait::async_trait;
use rust_bert::pipelines::common::ModelType;
use rust_bert::pipelines::translation::{Language, TranslationModel, TranslationModelBuilder};
use tch::Device;
use tracing::info;

use crate::core::errors::Result;
use crate::core::models::Direction;
use crate::core::provider::TranslationProvider;
use crate::core::worker::InferenceWorker;

/// Marian model owned by a dedicated inference thread.
///
/// The model is not thread-safe, so calls are queued and run one at a time.
#[derive(Debug)]
pub struct MarianProvider {
    direction: Direction,
    worker: InferenceWorker,
}

fn languages(direction: Direction) -> (Language, Language) {
    match direction {
        Direction::EnglishToRussian => (Language::English, Language::Russian),
        Direction::RussianToEnglish => (Language::Russian, Language::English),
    }
}

fn build_model(direction: Direction, device: Device) -> anyhow::Result<TranslationModel> {
    let (source, target) = languages(direction);
    let model = TranslationModelBuilder::new()
        .with_device(device)
        .with_model_type(ModelType::Marian)
        .with_source_languages(vec![source])
        .with_target_languages(vec![target])
        .create_model()?;
    Ok(model)
}

fn run_job(model: &TranslationModel, direction: Direction, text: &str) -> anyhow::Result<String> {
    let (source, target) = languages(direction);
    let output = model.translate(&[text], source, target)?;
    output
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("model returned no output"))
}

impl MarianProvider {
    /// Load the model for `direction`, blocking until it is ready.
    pub fn load(direction: Direction, use_gpu: bool) -> Result<Self> {
        let device = if use_gpu {
            Device::cuda_if_available()
        } else {
            Device::Cpu
        };
        info!("Loading {} on {:?}", direction.model_name(), device);

        let worker = InferenceWorker::spawn(
            direction,
            move || build_model(direction, device),
            move |model: &TranslationModel, text: &str| run_job(model, direction, text),
        )?;

        info!("Loaded {}", direction.model_name());
        Ok(Self { direction, worker })
    }
}

#[async_trait]
impl TranslationProvider for MarianProvider {
    fn direction(&self) -> Direction {
        self.direction
    }

    async fn translate(&self, text: &str) -> anyhow::Result<String> {
        self.worker.submit(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_cyrillic(s: &str) -> bool {
        s.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c))
    }

    #[test]
    fn test_language_pairs() {
        assert_eq!(
            languages(Direction::EnglishToRussian),
            (Language::English, Language::Russian)
        );
        assert_eq!(
            languages(Direction::RussianToEnglish),
            (Language::Russian, Language::English)
        );
    }

    // Downloads the opus-mt checkpoints on first run.
    #[tokio::test]
    #[ignore]
    async fn test_round_trip_with_pretrained_models() {
        let en_ru = tokio::task::spawn_blocking(|| MarianProvider::load(Direction::EnglishToRussian, false))
            .await
            .unwrap()
            .unwrap();
        let ru_en = tokio::task::spawn_blocking(|| MarianProvider::load(Direction::RussianToEnglish, false))
            .await
            .unwrap()
            .unwrap();

        let russian = en_ru.translate("Hello").await.unwrap();
        assert!(!russian.is_empty());
        assert!(is_cyrillic(&russian), "{russian}");
        assert_eq!(en_ru.translate("Hello").await.unwrap(), russian);

        let english = ru_en.translate("Привет").await.unwrap();
        assert!(!english.is_empty());
        assert!(english.chars().any(|c| c.is_ascii_alphabetic()), "{english}");
        assert!(!is_cyrillic(&english));
    }
}
