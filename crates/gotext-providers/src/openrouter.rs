//! OpenRouter proxy provider.
//!
//! Reuses OpenAI's request/response types. Only the base URL, default
//! model and attribution headers differ.

use async_trait::async_trait;
use gotext_core::{
    config::ProviderOptions,
    error::GotextError,
    traits::{Translator, TranslatorBuilder},
};
use tracing::debug;

use crate::openai::{build_chat_messages, ChatCompletionRequest, ChatCompletionResponse};
use crate::prompt::{error_for_status, http_client};

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
const REFERER: &str = "https://github.com/ksysoev/gotext-translator";
const TITLE: &str = "Gotext Translator";

/// Builds [`OpenRouterTranslator`]s.
pub struct OpenRouterProvider;

impl TranslatorBuilder for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn build(&self, options: &ProviderOptions) -> Result<Box<dyn Translator>, GotextError> {
        Ok(Box::new(OpenRouterTranslator {
            client: http_client("openrouter")?,
            base_url: options.base_url_or(OPENROUTER_BASE_URL),
            api_key: options.require_api_key("OpenRouter")?,
            model: options.model_or(DEFAULT_MODEL),
        }))
    }
}

/// OpenRouter translator. Routes requests to many models via the OpenAI-compatible API.
pub struct OpenRouterTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[async_trait]
impl Translator for OpenRouterTranslator {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, GotextError> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_chat_messages(text, target_lang),
            temperature: None,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("openrouter: POST {url} model={}", self.model);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| GotextError::Provider(format!("openrouter request failed: {e}")))?;
        let resp = error_for_status(resp, "openrouter").await?;

        let parsed: ChatCompletionResponse = resp.json().await.map_err(|e| {
            GotextError::Provider(format!("openrouter: failed to parse response: {e}"))
        })?;

        parsed.into_content("OpenRouter")
    }
}
