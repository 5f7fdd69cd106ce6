//! Prompt text and response helpers shared by every backend.

use gotext_core::error::GotextError;
use std::time::Duration;

pub(crate) const SYSTEM_PROMPT: &str = "You are a professional translator. Your task is to \
    translate text accurately while preserving all formatting, placeholders, and special characters.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn user_prompt(text: &str, target_lang: &str) -> String {
    format!(
        "Translate the following text to {target_lang}. \
         Preserve any formatting, placeholders, and special characters:\n\n{text}"
    )
}

/// HTTP client with the request timeout every backend uses.
pub(crate) fn http_client(provider: &str) -> Result<reqwest::Client, GotextError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| GotextError::Config(format!("{provider}: failed to build http client: {e}")))
}

/// Trim the model output; empty output is a provider error.
pub(crate) fn non_empty(content: Option<String>, provider: &str) -> Result<String, GotextError> {
    content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| GotextError::Provider(format!("{provider}: empty translation in response")))
}

/// Turn a non-2xx response into a provider error carrying status and body.
pub(crate) async fn error_for_status(
    resp: reqwest::Response,
    provider: &str,
) -> Result<reqwest::Response, GotextError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(GotextError::Provider(format!(
        "{provider} returned {status}: {text}"
    )))
}

/// Drop a leading "Here is the translation:" style paragraph.
///
/// Only the first `\n\n`-separated block is considered, and only when it
/// mentions a translation.
pub(crate) fn strip_explanation(text: &str) -> &str {
    match text.split_once("\n\n") {
        Some((head, rest)) if head.contains("translation") || head.contains("Translation") => {
            rest.trim()
        }
        _ => text,
    }
}
