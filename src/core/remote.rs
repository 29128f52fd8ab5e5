//! Provider backed by a remote translation API

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::config::ServerConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::Direction;
use crate::core::provider::TranslationProvider;

/// HTTP client for one direction of the remote translation API
#[derive(Debug, Clone)]
pub struct RemoteProvider {
    client: reqwest::Client,
    direction: Direction,
    api_endpoint: String,
    api_key: String,
    model: String,
}

impl RemoteProvider {
    /// Create a new remote provider
    pub fn new(direction: Direction, config: &ServerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| TranslationError::ModelLoad {
                direction,
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            direction,
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.remote_model.clone(),
        })
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "input": [{
                "role": "user",
                "content": [{
                    "type": "input_text",
                    "text": text,
                    "translation_options": {
                        "source_language": self.direction.source(),
                        "target_language": self.direction.target()
                    }
                }]
            }]
        })
    }
}

#[async_trait]
impl TranslationProvider for RemoteProvider {
    fn direction(&self) -> Direction {
        self.direction
    }

    async fn translate(&self, text: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.api_endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("API error: {} - {}", status.as_u16(), error_text);
        }

        let json: serde_json::Value = response.json().await?;
        if let Some(id) = json["id"].as_str() {
            debug!("Remote {} translation completed, request id {}", self.direction, id);
        }

        json["output"]["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Invalid response: no translation in response"))
    }
}
