use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Settings;
use crate::llm::client::LlmProvider;

const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// Client for a local Ollama server (`/api/generate`, non-streaming).
pub struct OllamaClient {
    http: Client,
    model: String,
    endpoint: String,
    options: OllamaOptions,
}

impl OllamaClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model = settings.llm.model.trim().to_string();
        if model.is_empty() {
            anyhow::bail!("Ollama model is missing. Set llm.model in config.");
        }

        let endpoint = if settings.llm.endpoint.trim().is_empty() {
            DEFAULT_OLLAMA_ENDPOINT.to_string()
        } else {
            settings
                .llm
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(settings.llm.timeout_secs))
                .build()
                .context("Failed to build Ollama HTTP client")?,
            model,
            endpoint,
            options: OllamaOptions {
                temperature: settings.summarizer.temperature,
                num_predict: settings.summarizer.max_output_tokens,
            },
        })
    }

    fn request_url(&self) -> String {
        format!("{}/api/generate", self.endpoint)
    }
}

#[async_trait]
impl LlmProvider for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: &self.options,
        };

        let response = self
            .http
            .post(self.request_url())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Ollama request to {} failed", self.endpoint))?;

        let response = response
            .error_for_status()
            .context("Ollama returned an error status")?;

        let payload: OllamaGenerateResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        let text = payload.response.trim();
        if text.is_empty() {
            anyhow::bail!("Ollama response did not contain summary text");
        }

        Ok(text.to_string())
    }
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: &'a OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_endpoint() {
        let mut settings = Settings::default();
        settings.llm.model = "llama3.2".to_string();

        let client = OllamaClient::from_settings(&settings).unwrap();
        assert_eq!(client.request_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn requires_model() {
        let mut settings = Settings::default();
        settings.llm.model = "  ".to_string();

        assert!(OllamaClient::from_settings(&settings).is_err());
    }

    #[test]
    fn request_disables_streaming() {
        let options = OllamaOptions {
            temperature: 0.0,
            num_predict: 64,
        };
        let body = OllamaGenerateRequest {
            model: "llama3.2",
            prompt: "hi",
            stream: false,
            options: &options,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["num_predict"], 64);
    }
}
