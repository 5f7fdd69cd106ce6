//! Scripted translators for engine tests.

use async_trait::async_trait;
use gotext_core::{error::GotextError, traits::Translator};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Answers from a fixed table; texts not in the table fail.
#[derive(Default)]
pub(crate) struct ScriptedTranslator {
    answers: HashMap<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTranslator {
    pub(crate) fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            answers: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Source texts seen so far, in call order.
    pub(crate) fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    /// Target languages seen so far, in call order.
    pub(crate) fn langs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, lang)| lang.clone())
            .collect()
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, GotextError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), target_lang.to_string()));
        self.answers
            .get(text)
            .cloned()
            .ok_or_else(|| GotextError::Provider(format!("no scripted answer for {text:?}")))
    }
}

/// Cancels the run on its first call and never answers.
pub(crate) struct CancellingTranslator(pub CancellationToken);

#[async_trait]
impl Translator for CancellingTranslator {
    fn name(&self) -> &str {
        "cancelling"
    }

    async fn translate(&self, _text: &str, _target_lang: &str) -> Result<String, GotextError> {
        self.0.cancel();
        std::future::pending().await
    }
}
