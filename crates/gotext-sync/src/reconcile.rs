//! Single-file reconciliation.
//!
//! Merges a freshly extracted source catalog into the existing target
//! catalog by message id, translates what is missing, and writes the
//! target back. Target messages are only ever added or updated; ids that
//! disappeared from the source are kept as they are.

use gotext_core::{
    catalog::{Catalog, Message},
    error::GotextError,
    traits::Translator,
};
use serde_json::Map;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Comment stored on messages whose translation was forcibly redone.
pub const MACHINE_TRANSLATED_COMMENT: &str = "Machine translated";

/// What one run was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// BCP-47 tag of the language to translate into.
    pub target_lang: String,
    /// Re-translate messages that already have a translation.
    pub force_rewrite: bool,
}

impl SyncRequest {
    pub fn new(target_lang: impl Into<String>, force_rewrite: bool) -> Self {
        Self {
            target_lang: target_lang.into(),
            force_rewrite,
        }
    }
}

/// Result of merging one catalog in memory.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub catalog: Catalog,
    /// Messages (re)translated in this pass.
    pub translated: usize,
    /// Messages left alone because they already had a translation.
    pub skipped: usize,
    /// Ids whose provider call failed; their previous translation is kept.
    pub failed: Vec<String>,
}

/// Outcome of [`sync_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub source: PathBuf,
    pub target: PathBuf,
    /// No target catalog existed before this run.
    pub created: bool,
    pub translated: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
}

/// Merge `source` into `existing` (or a fresh catalog) and translate what is missing.
///
/// A provider failure on one message is logged and recorded in
/// [`Reconciled::failed`]; it never aborts the merge. Cancellation drops
/// the in-flight provider call and returns [`GotextError::Cancelled`].
pub async fn reconcile(
    source: &Catalog,
    existing: Option<Catalog>,
    request: &SyncRequest,
    translator: &dyn Translator,
    cancel: &CancellationToken,
) -> Result<Reconciled, GotextError> {
    let mut target = existing.unwrap_or_else(|| Catalog {
        language: request.target_lang.clone(),
        messages: source.messages.iter().map(Message::skeleton).collect(),
        extra: Map::new(),
    });
    if target.language.is_empty() {
        target.language = request.target_lang.clone();
    } else if target.language != request.target_lang {
        warn!(
            catalog_language = %target.language,
            target_lang = %request.target_lang,
            "existing catalog language differs from the requested target"
        );
    }

    let mut index = target.index();
    let mut translated = 0;
    let mut skipped = 0;
    let mut failed = Vec::new();

    for src in &source.messages {
        let pos = match index.get(&src.id) {
            Some(&pos) => {
                // The stored translation survives a changed source text.
                let msg = &mut target.messages[pos];
                msg.message.clone_from(&src.message);
                msg.placeholders.clone_from(&src.placeholders);
                pos
            }
            None => {
                target.messages.push(Message::skeleton(src));
                let pos = target.messages.len() - 1;
                index.insert(src.id.clone(), pos);
                pos
            }
        };

        let msg = &mut target.messages[pos];
        if msg.is_translated() && !request.force_rewrite {
            debug!(id = %msg.id, "skipping translated message");
            skipped += 1;
            continue;
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GotextError::Cancelled),
            r = translator.translate(&msg.message, &request.target_lang) => r,
        };

        match result {
            Ok(translation) if !translation.is_empty() => {
                info!(
                    id = %msg.id,
                    original = %msg.message,
                    translation = %translation,
                    "translated message"
                );
                msg.translation = translation;
                if request.force_rewrite {
                    msg.translator_comment = MACHINE_TRANSLATED_COMMENT.to_string();
                }
                translated += 1;
            }
            Ok(_) => {
                warn!(id = %msg.id, "provider returned an empty translation");
                failed.push(msg.id.clone());
            }
            Err(e) => {
                warn!(id = %msg.id, error = %e, "failed to translate message");
                failed.push(msg.id.clone());
            }
        }
    }

    Ok(Reconciled {
        catalog: target,
        translated,
        skipped,
        failed,
    })
}

/// Reconcile the catalog at `source_path` into `target_path` and write it.
///
/// The target is written once, after every message has been decided, and
/// not at all when the run is cancelled.
pub async fn sync_file(
    source_path: &Path,
    target_path: &Path,
    request: &SyncRequest,
    translator: &dyn Translator,
    cancel: &CancellationToken,
) -> Result<FileReport, GotextError> {
    let source = Catalog::read(source_path)?;
    source.ensure_unique_ids(source_path)?;
    let existing = Catalog::read_optional(target_path)?;
    let created = existing.is_none();

    info!(
        source = %source_path.display(),
        target = %target_path.display(),
        total_messages = source.messages.len(),
        "processing file"
    );

    let reconciled = reconcile(&source, existing, request, translator, cancel).await?;
    if cancel.is_cancelled() {
        return Err(GotextError::Cancelled);
    }
    reconciled.catalog.write(target_path)?;

    info!(
        file = %target_path.display(),
        new_file = created,
        processed = reconciled.translated,
        failed = reconciled.failed.len(),
        "file processing completed"
    );

    Ok(FileReport {
        source: source_path.to_path_buf(),
        target: target_path.to_path_buf(),
        created,
        translated: reconciled.translated,
        skipped: reconciled.skipped,
        failed: reconciled.failed,
    })
}
