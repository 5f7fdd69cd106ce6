//! OpenAI-compatible chat completions provider.
//!
//! Works with OpenAI's API and any compatible endpoint (`base_url` option).
//! Exports `pub(crate)` types reused by the OpenRouter provider.

use async_trait::async_trait;
use gotext_core::{
    config::ProviderOptions,
    error::GotextError,
    traits::{Translator, TranslatorBuilder},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prompt::{error_for_status, http_client, non_empty, user_prompt, SYSTEM_PROMPT};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Builds [`OpenAiTranslator`]s.
pub struct OpenAiProvider;

impl TranslatorBuilder for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn build(&self, options: &ProviderOptions) -> Result<Box<dyn Translator>, GotextError> {
        Ok(Box::new(OpenAiTranslator {
            client: http_client("openai")?,
            base_url: options.base_url_or(OPENAI_BASE_URL),
            api_key: options.require_api_key("OpenAI")?,
            model: options.model_or(DEFAULT_MODEL),
            temperature: options.parse_or("temperature", DEFAULT_TEMPERATURE)?,
        }))
    }
}

/// OpenAI chat completions translator.
pub struct OpenAiTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

/// System + user messages for one translation request.
pub(crate) fn build_chat_messages(text: &str, target_lang: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: user_prompt(text, target_lang),
        },
    ]
}

#[derive(Serialize, Deserialize, Clone)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Option<Vec<ChatChoice>>,
    pub error: Option<ApiError>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponseMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub message: String,
}

impl ChatCompletionResponse {
    /// First choice's content, or the API error the body reported.
    pub(crate) fn into_content(self, provider: &str) -> Result<String, GotextError> {
        if let Some(err) = self.error {
            return Err(GotextError::Provider(format!(
                "{provider} API error: {}",
                err.message
            )));
        }
        let content = self
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message)
            .and_then(|m| m.content);
        non_empty(content, provider)
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, GotextError> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_chat_messages(text, target_lang),
            temperature: Some(self.temperature),
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("openai: POST {url} model={}", self.model);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| GotextError::Provider(format!("openai request failed: {e}")))?;
        let resp = error_for_status(resp, "openai").await?;

        let parsed: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| GotextError::Provider(format!("openai: failed to parse response: {e}")))?;

        parsed.into_content("openai")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(base_url: &str) -> ProviderOptions {
        ProviderOptions::new()
            .with("api_key", "sk-test")
            .with("model", "gpt-4o-mini")
            .with("base_url", base_url)
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[test]
    fn test_build_requires_api_key() {
        let err = OpenAiProvider
            .build(&ProviderOptions::new().with("model", "gpt-4o"))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "config error: OpenAI API key is required");
    }

    #[test]
    fn test_build_rejects_bad_temperature() {
        let opts = options("http://localhost").with("temperature", "warm");
        assert!(matches!(
            OpenAiProvider.build(&opts),
            Err(GotextError::Config(_))
        ));
    }

    #[test]
    fn test_request_serialization() {
        let body = ChatCompletionRequest {
            model: "gpt-3.5-turbo".into(),
            messages: build_chat_messages("Hello", "de-DE"),
            temperature: Some(0.3),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("de-DE"));
    }

    #[tokio::test]
    async fn test_translate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4o-mini", "temperature": 0.3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Привет, Мир!\n")))
            .expect(1)
            .mount(&server)
            .await;

        let t = OpenAiProvider.build(&options(&server.uri())).unwrap();
        let out = t.translate("Hello, World!", "ru-RU").await.unwrap();
        assert_eq!(out, "Привет, Мир!");
        assert_eq!(t.name(), "openai");
    }

    #[tokio::test]
    async fn test_translate_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let t = OpenAiProvider.build(&options(&server.uri())).unwrap();
        let err = t.translate("Hello", "ru-RU").await.unwrap_err();
        assert!(matches!(err, GotextError::Provider(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_translate_no_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let t = OpenAiProvider.build(&options(&server.uri())).unwrap();
        assert!(t.translate("Hello", "ru-RU").await.is_err());
    }

    #[tokio::test]
    async fn test_translate_unparseable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let t = OpenAiProvider.build(&options(&server.uri())).unwrap();
        let err = t.translate("Hello", "ru-RU").await.unwrap_err();
        assert!(err.to_string().contains("failed to parse response"));
    }
}
