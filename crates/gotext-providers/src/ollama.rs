//! Ollama local model provider.
//!
//! Connects to a locally running Ollama server. No API key required.

use async_trait::async_trait;
use gotext_core::{
    config::ProviderOptions,
    error::GotextError,
    traits::{Translator, TranslatorBuilder},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prompt::{error_for_status, http_client, non_empty, user_prompt, SYSTEM_PROMPT};

const OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3";

/// Builds [`OllamaTranslator`]s.
pub struct OllamaProvider;

impl TranslatorBuilder for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn build(&self, options: &ProviderOptions) -> Result<Box<dyn Translator>, GotextError> {
        Ok(Box::new(OllamaTranslator {
            client: http_client("ollama")?,
            base_url: options.base_url_or(OLLAMA_BASE_URL),
            model: options.model_or(DEFAULT_MODEL),
        }))
    }
}

/// Translator backed by a local Ollama server.
pub struct OllamaTranslator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaChatMessage>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct OllamaChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaChatMessage>,
    error: Option<String>,
}

#[async_trait]
impl Translator for OllamaTranslator {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, GotextError> {
        let body = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![
                OllamaChatMessage {
                    role: "system".to_string(),
                    content: Some(SYSTEM_PROMPT.to_string()),
                },
                OllamaChatMessage {
                    role: "user".to_string(),
                    content: Some(user_prompt(text, target_lang)),
                },
            ],
            stream: false,
        };

        let url = format!("{}/api/chat", self.base_url);
        debug!("ollama: POST {url} model={}", self.model);

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GotextError::Provider(format!("ollama request failed: {e}")))?;
        let resp = error_for_status(resp, "ollama").await?;

        let parsed: OllamaChatResponse = resp
            .json()
            .await
            .map_err(|e| GotextError::Provider(format!("ollama: failed to parse response: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(GotextError::Provider(format!("ollama error: {err}")));
        }
        non_empty(parsed.message.and_then(|m| m.content), "ollama")
    }
}
