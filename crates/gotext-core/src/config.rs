use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::error::GotextError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
}

/// LLM provider selection and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    /// Empty means "use the provider's default model".
    #[serde(default)]
    pub model: String,
    /// Vendor-specific options (e.g. `base_url`, `temperature`), passed through as-is.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            model: String::new(),
            options: BTreeMap::new(),
        }
    }
}

impl LlmConfig {
    /// Flatten into the option map handed to a provider builder.
    ///
    /// `api_key` and `model` are always present; extra options never
    /// override them.
    pub fn provider_options(&self) -> ProviderOptions {
        let mut map = self.options.clone();
        map.insert(ProviderOptions::API_KEY.to_string(), self.api_key.clone());
        map.insert(ProviderOptions::MODEL.to_string(), self.model.clone());
        ProviderOptions(map)
    }
}

impl Config {
    /// Apply `LLM_PROVIDER`, `LLM_API_KEY` and `LLM_MODEL` overrides.
    ///
    /// `lookup` resolves a variable name; empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(v) = get("LLM_PROVIDER") {
            self.llm.provider = v;
        }
        if let Some(v) = get("LLM_API_KEY") {
            self.llm.api_key = v;
        }
        if let Some(v) = get("LLM_MODEL") {
            self.llm.model = v;
        }
    }
}

/// Flat option map for building a translator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions(BTreeMap<String, String>);

impl ProviderOptions {
    pub const API_KEY: &'static str = "api_key";
    pub const MODEL: &'static str = "model";
    pub const BASE_URL: &'static str = "base_url";

    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Value for `key`, treating empty strings as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// The API key, or a config error naming the provider that needs it.
    pub fn require_api_key(&self, provider: &str) -> Result<String, GotextError> {
        self.get(Self::API_KEY)
            .map(str::to_string)
            .ok_or_else(|| GotextError::Config(format!("{provider} API key is required")))
    }

    /// The configured model, or `default` when none was given.
    pub fn model_or(&self, default: &str) -> String {
        self.get(Self::MODEL).unwrap_or(default).to_string()
    }

    /// The configured base URL without a trailing slash, or `default`.
    pub fn base_url_or(&self, default: &str) -> String {
        self.get(Self::BASE_URL)
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }

    /// Parse an optional option value, failing with a config error when malformed.
    pub fn parse_or<T>(&self, key: &str, default: T) -> Result<T, GotextError>
    where
        T: std::str::FromStr,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| GotextError::Config(format!("invalid value for {key}: {raw:?}"))),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

/// Load configuration from an optional TOML file, then apply env overrides.
///
/// With no path, defaults are used. A path that cannot be read or parsed
/// is a config error.
pub fn load(path: Option<&Path>) -> Result<Config, GotextError> {
    load_with(path, |key| std::env::var(key).ok())
}

/// [`load`] with an explicit variable lookup instead of the process environment.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Config, GotextError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        None => {
            info!("no config file given, using defaults");
            Config::default()
        }
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                GotextError::Config(format!("failed to read {}: {}", path.display(), e))
            })?;
            toml::from_str(&content)
                .map_err(|e| GotextError::Config(format!("failed to parse config: {}", e)))?
        }
    };

    config.apply_env_overrides(lookup);
    Ok(config)
}
