//! Anthropic Messages API provider.

use async_trait::async_trait;
use gotext_core::{
    config::ProviderOptions,
    error::GotextError,
    traits::{Translator, TranslatorBuilder},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prompt::{
    error_for_status, http_client, non_empty, strip_explanation, user_prompt, SYSTEM_PROMPT,
};

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Builds [`AnthropicTranslator`]s.
pub struct AnthropicProvider;

impl TranslatorBuilder for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn build(&self, options: &ProviderOptions) -> Result<Box<dyn Translator>, GotextError> {
        Ok(Box::new(AnthropicTranslator {
            client: http_client("anthropic")?,
            base_url: options.base_url_or(ANTHROPIC_BASE_URL),
            api_key: options.require_api_key("Anthropic")?,
            model: options.model_or(DEFAULT_MODEL),
            max_tokens: options.parse_or("max_tokens", DEFAULT_MAX_TOKENS)?,
        }))
    }
}

/// Anthropic Messages API translator.
pub struct AnthropicTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Option<Vec<AnthropicContentBlock>>,
    error: Option<AnthropicError>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct AnthropicError {
    #[serde(default)]
    message: String,
}

impl AnthropicResponse {
    /// First text block, minus any explanatory preamble.
    fn into_translation(self) -> Result<String, GotextError> {
        if let Some(err) = self.error {
            return Err(GotextError::Provider(format!(
                "Anthropic API error: {}",
                err.message
            )));
        }
        let text = self
            .content
            .unwrap_or_default()
            .into_iter()
            .find(|b| b.kind == "text")
            .map(|b| b.text);
        let text = non_empty(text, "anthropic")?;
        Ok(strip_explanation(&text).to_string())
    }
}

#[async_trait]
impl Translator for AnthropicTranslator {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, GotextError> {
        let body = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: user_prompt(text, target_lang),
            }],
        };

        let url = format!("{}/messages", self.base_url);
        debug!("anthropic: POST {url} model={}", self.model);

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GotextError::Provider(format!("anthropic request failed: {e}")))?;
        let resp = error_for_status(resp, "anthropic").await?;

        let parsed: AnthropicResponse = resp.json().await.map_err(|e| {
            GotextError::Provider(format!("anthropic: failed to parse response: {e}"))
        })?;

        parsed.into_translation()
    }
}
