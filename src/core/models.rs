//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::TranslationError;

/// Language a request is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    /// English, translated to Russian
    En,
    /// Russian, translated to English
    Ru,
}

impl SourceLanguage {
    /// Direction served for this source language
    pub fn direction(self) -> Direction {
        match self {
            SourceLanguage::En => Direction::EnglishToRussian,
            SourceLanguage::Ru => Direction::RussianToEnglish,
        }
    }

    /// Wire code, `en` or `ru`
    pub fn code(self) -> &'static str {
        match self {
            SourceLanguage::En => "en",
            SourceLanguage::Ru => "ru",
        }
    }
}

impl FromStr for SourceLanguage {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(SourceLanguage::En),
            "ru" => Ok(SourceLanguage::Ru),
            other => Err(TranslationError::UnsupportedLanguage {
                lang: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fixed source -> target pairing of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// en -> ru
    EnglishToRussian,
    /// ru -> en
    RussianToEnglish,
}

impl Direction {
    /// Source language code
    pub fn source(self) -> &'static str {
        match self {
            Direction::EnglishToRussian => "en",
            Direction::RussianToEnglish => "ru",
        }
    }

    /// Target language code
    pub fn target(self) -> &'static str {
        match self {
            Direction::EnglishToRussian => "ru",
            Direction::RussianToEnglish => "en",
        }
    }

    /// Pretrained checkpoint serving this direction
    pub fn model_name(self) -> &'static str {
        match self {
            Direction::EnglishToRussian => "Helsinki-NLP/opus-mt-en-ru",
            Direction::RussianToEnglish => "Helsinki-NLP/opus-mt-ru-en",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source(), self.target())
    }
}

/// True when `text` has nothing but whitespace, including the
/// U+001C..U+001F separators that `str::trim` keeps.
pub fn is_blank(text: &str) -> bool {
    text.trim_matches(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
        .is_empty()
}

/// Translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Text to translate
    pub text: String,
    /// Language of `text`; kept raw so unknown codes reach the dispatcher
    pub source_lang: String,
}

impl TranslationRequest {
    /// Build a request from text and a language code
    pub fn new(text: impl Into<String>, source_lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
        }
    }

    /// Reject empty or whitespace-only text
    pub fn validate(&self) -> Result<(), TranslationError> {
        if is_blank(&self.text) {
            return Err(TranslationError::EmptyText);
        }
        Ok(())
    }
}

/// Translation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Provider output
    pub translated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_language() {
        assert_eq!("en".parse::<SourceLanguage>().unwrap(), SourceLanguage::En);
        assert_eq!("ru".parse::<SourceLanguage>().unwrap(), SourceLanguage::Ru);
    }

    #[test]
    fn test_parse_rejects_other_codes() {
        for code in ["fr", "EN", "", " en", "eng"] {
            let err = code.parse::<SourceLanguage>().unwrap_err();
            assert!(matches!(err, TranslationError::UnsupportedLanguage { .. }), "{code}");
        }
    }

    #[test]
    fn test_direction_mapping() {
        assert_eq!(SourceLanguage::En.direction(), Direction::EnglishToRussian);
        assert_eq!(SourceLanguage::Ru.direction(), Direction::RussianToEnglish);
        assert_eq!(Direction::EnglishToRussian.to_string(), "en-ru");
        assert_eq!(Direction::RussianToEnglish.model_name(), "Helsinki-NLP/opus-mt-ru-en");
    }

    #[test]
    fn test_validate_text() {
        assert!(TranslationRequest::new("Hello", "en").validate().is_ok());
        assert!(TranslationRequest::new("", "en").validate().is_err());
        assert!(TranslationRequest::new(" \t\n ", "fr").validate().is_err());
        assert!(TranslationRequest::new("\u{1c}\u{1f}", "en").validate().is_err());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank("\u{1c}\u{1d}\u{1e}\u{1f}\u{a0}\u{3000}"));
        assert!(!is_blank("\u{1c}a\u{1f}"));
        assert!(!is_blank("\u{1b}"));
    }
}
