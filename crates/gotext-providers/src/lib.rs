//! # gotext-providers
//!
//! LLM translation backends and the name-keyed registry that builds them.

pub mod anthropic;
pub mod ollama;
pub mod openai;
pub mod openrouter;
mod prompt;
pub mod registry;

pub use registry::ProviderRegistry;
