use crate::{config::ProviderOptions, error::GotextError};
use async_trait::async_trait;

/// Translation capability.
///
/// Every LLM backend (OpenAI, Anthropic, OpenRouter, Ollama, etc.)
/// implements this trait. Implementations hold no mutable state once
/// configured, so one instance serves every message of a run.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Name of the provider that built this translator.
    fn name(&self) -> &str;

    /// Translate `text` into `target_lang` (a BCP-47 tag such as `ru-RU`).
    ///
    /// Returns only the translated string. Formatting markers and
    /// placeholder tokens in `text` are asked to be preserved through the
    /// prompt; nothing here checks that they were.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, GotextError>;
}

/// Named constructor for a [`Translator`], registered in the provider registry.
pub trait TranslatorBuilder: Send + Sync {
    /// Registry key, e.g. `"openai"`.
    fn name(&self) -> &str;

    /// Build a translator from flat provider options.
    ///
    /// Fails with [`GotextError::Config`] when a required option is missing.
    fn build(&self, options: &ProviderOptions) -> Result<Box<dyn Translator>, GotextError>;
}
