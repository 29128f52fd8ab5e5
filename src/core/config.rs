//! Configuration management

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use crate::core::errors::{Result, TranslationError};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_API_ENDPOINT: &str = "https://ark.cn-beijing.volces.com/api/v3/responses";
const DEFAULT_REMOTE_MODEL: &str = "doubao-seed-translation-250915";
const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// Inference backend used for both directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local opus-mt models through rust-bert
    Marian,
    /// Remote translation API
    Remote,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "marian") {
            Backend::Marian
        } else {
            Backend::Remote
        }
    }
}

impl FromStr for Backend {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "marian" => Ok(Backend::Marian),
            "remote" => Ok(Backend::Remote),
            other => Err(TranslationError::ConfigError {
                message: format!("unknown backend '{}', expected 'marian' or 'remote'", other),
            }),
        }
    }
}

// Same spelling rules as the env var and CLI flag
impl<'de> Deserialize<'de> for Backend {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Marian => write!(f, "marian"),
            Backend::Remote => write!(f, "remote"),
        }
    }
}

/// Configuration for the translation server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Only origin allowed to make cross-origin requests
    pub allowed_origin: String,
    /// Inference backend for both directions
    pub backend: Backend,
    /// Run Marian models on CUDA when available
    pub use_gpu: bool,
    /// Bearer token for the remote backend
    pub api_key: String,
    /// Remote translation endpoint
    pub api_endpoint: String,
    /// Model id sent to the remote backend
    pub remote_model: String,
    /// Remote request timeout
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ORIGIN.to_string(),
            backend: Backend::default(),
            use_gpu: false,
            api_key: String::new(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            remote_model: DEFAULT_REMOTE_MODEL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T::Err: fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| TranslationError::ConfigError {
            message: format!("invalid {}='{}': {}", key, raw, e),
        }),
        None => Ok(default),
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().merge_lookup(lookup)
    }

    /// Override fields with whatever variables `lookup` provides
    pub fn merge_lookup<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: lookup("HOST").unwrap_or(self.host),
            port: parse_var("PORT", lookup("PORT"), self.port)?,
            allowed_origin: lookup("ALLOWED_ORIGIN").unwrap_or(self.allowed_origin),
            backend: parse_var("TRANSLATOR_BACKEND", lookup("TRANSLATOR_BACKEND"), self.backend)?,
            use_gpu: parse_var("USE_GPU", lookup("USE_GPU"), self.use_gpu)?,
            api_key: lookup("ARK_API_KEY").unwrap_or(self.api_key),
            api_endpoint: lookup("API_ENDPOINT").unwrap_or(self.api_endpoint),
            remote_model: lookup("REMOTE_MODEL").unwrap_or(self.remote_model),
            timeout_ms: parse_var("REQUEST_TIMEOUT_MS", lookup("REQUEST_TIMEOUT_MS"), self.timeout_ms)?,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Address the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(TranslationError::ConfigError {
                message: "port must be greater than 0".to_string(),
            });
        }

        if self.allowed_origin.parse::<axum::http::HeaderValue>().is_err()
            || !(self.allowed_origin.starts_with("http://")
                || self.allowed_origin.starts_with("https://"))
        {
            return Err(TranslationError::ConfigError {
                message: format!("invalid allowed origin: {}", self.allowed_origin),
            });
        }

        match self.backend {
            Backend::Remote => {
                if self.api_endpoint.is_empty() {
                    return Err(TranslationError::ConfigError {
                        message: "API endpoint is required for the remote backend".to_string(),
                    });
                }
                if self.api_key.is_empty() {
                    return Err(TranslationError::ConfigError {
                        message: "ARK_API_KEY is required for the remote backend".to_string(),
                    });
                }
                if self.timeout_ms == 0 {
                    return Err(TranslationError::ConfigError {
                        message: "timeout_ms must be greater than 0".to_string(),
                    });
                }
            }
            Backend::Marian => {
                if !cfg!(feature = "marian") {
                    return Err(TranslationError::ConfigError {
                        message: "marian backend requested but the binary was built without the `marian` feature".to_string(),
                    });
                }
                if self.use_gpu {
                    warn!("GPU requested; falling back to CPU if CUDA is unavailable");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn remote_config() -> ServerConfig {
        ServerConfig {
            backend: Backend::Remote,
            api_key: "test_key".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.allowed_origin, "http://localhost:3000");
        assert_eq!(config.backend, Backend::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("ALLOWED_ORIGIN", "https://app.example.com"),
            ("TRANSLATOR_BACKEND", "Remote"),
            ("ARK_API_KEY", "k"),
            ("USE_GPU", "true"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.allowed_origin, "https://app.example.com");
        assert_eq!(config.backend, Backend::Remote);
        assert_eq!(config.api_key, "k");
        assert!(config.use_gpu);
    }

    #[test]
    fn test_invalid_env_values() {
        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("TRANSLATOR_BACKEND", "onnx")])).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(remote_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_key() {
        let config = ServerConfig {
            api_key: "".to_string(),
            ..remote_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_origin() {
        let config = ServerConfig {
            allowed_origin: "localhost:3000".to_string(),
            ..remote_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_marian_requires_feature() {
        let config = ServerConfig {
            backend: Backend::Marian,
            ..Default::default()
        };

        assert_eq!(config.validate().is_ok(), cfg!(feature = "marian"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"port": 5050, "backend": "remote", "api_key": "test_key"}"#,
        )
        .unwrap();

        let loaded = ServerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.port, 5050);
        assert_eq!(loaded.backend, Backend::Remote);
        assert_eq!(loaded.api_key, "test_key");
    }

    #[test]
    fn test_backend_spelling_matches_env_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"backend": "Remote"}"#).unwrap();

        let from_file = ServerConfig::from_file(&path).unwrap();
        let from_env = ServerConfig::from_lookup(lookup(&[("TRANSLATOR_BACKEND", "Remote")])).unwrap();
        assert_eq!(from_file.backend, Backend::Remote);
        assert_eq!(from_env.backend, Backend::Remote);

        std::fs::write(&path, r#"{"backend": "onnx"}"#).unwrap();
        assert!(ServerConfig::from_file(&path).is_err());

        assert_eq!(serde_json::to_value(Backend::Marian).unwrap(), "marian");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"port": 7000}"#).unwrap();

        let loaded = ServerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.port, 7000);
        assert_eq!(loaded.host, "0.0.0.0");
    }
}
