// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Ollama API client for local AI inference

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::describe::Describer;
use crate::{Result, SnapnameError};

/// Ollama API client
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    images: Vec<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

/// Strip trailing slashes and endpoint paths from a configured URL
pub fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/')
        .replace("/api/generate", "")
        .replace("/api/chat", "")
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut builder = Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/api/tags", self.base_url);

        self.client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                SnapnameError::OllamaUnavailable(format!(
                    "Cannot connect to Ollama at {}: {}",
                    self.base_url, e
                ))
            })?;

        Ok(())
    }

    /// List available models
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client
            .get(&url)
            .send()
            .await?;

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Check if a specific model is available
    pub async fn model_available(&self, model: &str) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(has_model(&models, model))
    }

    /// Generate with image (for vision models)
    pub async fn generate_with_image(
        &self,
        model: &str,
        prompt: &str,
        image: &[u8],
    ) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            images: vec![general_purpose::STANDARD.encode(image)],
        };

        debug!("Sending vision request to Ollama: model={}", model);

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SnapnameError::Describe(format!(
                "Ollama returned status {}",
                response.status()
            )));
        }

        let result: GenerateResponse = response.json().await?;
        Ok(result.response)
    }

    /// Generate with image, retrying with exponential backoff
    pub async fn generate_with_image_retry(
        &self,
        model: &str,
        prompt: &str,
        image: &[u8],
        retries: u32,
    ) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..=retries {
            if attempt > 0 {
                let delay = Duration::from_secs(2u64.pow((attempt - 1).min(6)));
                warn!("Retrying Ollama request in {:?} (attempt {})", delay, attempt + 1);
                tokio::time::sleep(delay).await;
            }

            match self.generate_with_image(model, prompt, image).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SnapnameError::OllamaUnavailable("Unknown error".to_string())
        }))
    }
}

/// Whether `model` appears in a tag listing, allowing an implicit `:latest`
pub fn has_model(models: &[String], model: &str) -> bool {
    models.iter().any(|m| m.starts_with(model) || m == &format!("{}:latest", model))
}

/// Vision model served by Ollama
pub struct OllamaDescriber {
    client: OllamaClient,
    model: String,
    retries: u32,
}

impl OllamaDescriber {
    pub fn new(client: OllamaClient, model: impl Into<String>, retries: u32) -> Self {
        Self {
            client,
            model: model.into(),
            retries,
        }
    }

    /// Build a describer from the engine section of the configuration
    pub fn from_config(engine: &EngineConfig) -> Result<Self> {
        let client = OllamaClient::new(&engine.url, Duration::from_secs(engine.timeout_secs))?;
        Ok(Self::new(client, engine.model.clone(), engine.retries))
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Describer for OllamaDescriber {
    fn name(&self) -> &str {
        &self.model
    }

    async fn describe(&self, image: &[u8], prompt: &str) -> Result<String> {
        self.client
            .generate_with_image_retry(&self.model, prompt, image, self.retries)
            .await
    }
}
