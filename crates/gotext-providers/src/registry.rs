//! Name-keyed registry of translator builders.
//!
//! Reads (listing, building) take a shared lock and registration takes an
//! exclusive one, so a registry can be shared across threads even though
//! the CLI only touches it from one.

use gotext_core::{
    config::ProviderOptions,
    error::GotextError,
    traits::{Translator, TranslatorBuilder},
};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error};

use crate::{
    anthropic::AnthropicProvider, ollama::OllamaProvider, openai::OpenAiProvider,
    openrouter::OpenRouterProvider,
};

/// Registry of translation providers.
///
/// # Invariants
/// - Provider names are unique within the registry.
#[derive(Default)]
pub struct ProviderRegistry {
    builders: RwLock<BTreeMap<String, Arc<dyn TranslatorBuilder>>>,
}

impl ProviderRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every bundled provider registered.
    pub fn with_builtin_providers() -> Self {
        let registry = Self::new();
        registry.register_builtin_providers();
        registry
    }

    /// Register the bundled providers. A failure is logged and the rest still register.
    pub fn register_builtin_providers(&self) {
        let builtin: [Arc<dyn TranslatorBuilder>; 4] = [
            Arc::new(OpenAiProvider),
            Arc::new(OpenRouterProvider),
            Arc::new(AnthropicProvider),
            Arc::new(OllamaProvider),
        ];

        for builder in builtin {
            let name = builder.name().to_string();
            match self.register(builder) {
                Ok(()) => debug!(provider = %name, "registered provider"),
                Err(e) => error!(provider = %name, error = %e, "failed to register provider"),
            }
        }
    }

    /// Register a builder under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`GotextError::DuplicateProvider`] when the name is taken.
    pub fn register(&self, builder: Arc<dyn TranslatorBuilder>) -> Result<(), GotextError> {
        let mut builders = self.builders.write().unwrap_or_else(PoisonError::into_inner);
        let name = builder.name().to_string();
        if builders.contains_key(&name) {
            return Err(GotextError::DuplicateProvider(name));
        }
        builders.insert(name, builder);
        Ok(())
    }

    /// Registered provider names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.builders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Build a translator from the named provider.
    ///
    /// # Errors
    ///
    /// Returns [`GotextError::UnknownProvider`] for an unregistered name, or
    /// whatever the builder rejects the options with.
    pub fn create_translator(
        &self,
        name: &str,
        options: &ProviderOptions,
    ) -> Result<Box<dyn Translator>, GotextError> {
        let builder = self
            .builders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| GotextError::UnknownProvider(name.to_string()))?;
        builder.build(options)
    }
}
