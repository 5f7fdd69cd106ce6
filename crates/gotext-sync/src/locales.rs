//! Directory-level orchestration over a `<root>/locales/<lang>/` tree.
//!
//! One source language directory is mirrored into the target language
//! directory file by file. A file that cannot be read, parsed or written
//! is logged and skipped; cancellation stops the whole walk.

use gotext_core::{catalog::is_source_catalog, error::GotextError, traits::Translator};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::reconcile::{sync_file, SyncRequest};

/// Directory under the project root that holds one subdirectory per language.
pub const LOCALES_DIR: &str = "locales";

/// Totals for a directory run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub files_processed: usize,
    pub files_failed: usize,
    pub messages_translated: usize,
}

/// Translate every catalog under `<root>/locales/<source>/` into
/// `<root>/locales/<target>/`, keeping relative paths.
///
/// `source_lang` picks the source directory explicitly; without it the
/// first non-target directory in name order is used.
pub async fn sync_locales(
    root: &Path,
    source_lang: Option<&str>,
    request: &SyncRequest,
    translator: &dyn Translator,
    cancel: &CancellationToken,
) -> Result<BatchReport, GotextError> {
    let base = root.join(LOCALES_DIR);
    let source_dir = select_source_dir(&base, &request.target_lang, source_lang)?;

    let target_dir = base.join(&request.target_lang);
    std::fs::create_dir_all(&target_dir).map_err(|e| GotextError::io(&target_dir, e))?;

    info!(
        source_dir = %source_dir.display(),
        target_dir = %target_dir.display(),
        target_lang = %request.target_lang,
        "starting directory translation"
    );

    let files = find_catalogs(&source_dir);
    info!(count = files.len(), "found source files");

    let mut report = BatchReport::default();
    for source_file in files {
        let Ok(rel) = source_file.strip_prefix(&source_dir) else {
            error!(file = %source_file.display(), "failed to get relative path");
            report.files_failed += 1;
            continue;
        };
        let target_file = target_dir.join(rel);

        if let Some(parent) = target_file.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!(dir = %parent.display(), error = %e, "failed to create target directory");
                report.files_failed += 1;
                continue;
            }
        }

        match sync_file(&source_file, &target_file, request, translator, cancel).await {
            Ok(file) => {
                report.files_processed += 1;
                report.messages_translated += file.translated;
            }
            Err(e) if e.is_file_local() => {
                error!(file = %source_file.display(), error = %e, "failed to process file");
                report.files_failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        target_lang = %request.target_lang,
        processed_files = report.files_processed,
        failed_files = report.files_failed,
        processed_messages = report.messages_translated,
        "directory translation completed"
    );

    Ok(report)
}

/// Resolve the source language directory under `base`.
fn select_source_dir(
    base: &Path,
    target_lang: &str,
    source_lang: Option<&str>,
) -> Result<PathBuf, GotextError> {
    if let Some(lang) = source_lang {
        if lang == target_lang {
            return Err(GotextError::Config(format!(
                "source language {lang} is the same as the target language"
            )));
        }
        let dir = base.join(lang);
        if !dir.is_dir() {
            return Err(GotextError::Config(format!(
                "source language directory {} does not exist",
                dir.display()
            )));
        }
        return Ok(dir);
    }

    let no_source = || {
        GotextError::Config(format!(
            "no source language directories found in {}",
            base.display()
        ))
    };

    let entries = match std::fs::read_dir(base) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(no_source()),
        Err(e) => return Err(GotextError::io(base, e)),
    };
    let mut candidates: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name != target_lang)
        .collect();
    candidates.sort();

    match candidates.first() {
        Some(first) => {
            if candidates.len() > 1 {
                info!(
                    chosen = %first,
                    candidates = ?candidates,
                    "several source languages found, using the first; pass a source language to choose"
                );
            }
            Ok(base.join(first))
        }
        None => Err(no_source()),
    }
}

/// Every source catalog under `dir`, in name order.
fn find_catalogs(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable path");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_source_catalog(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CancellingTranslator, ScriptedTranslator};
    use gotext_core::catalog::Catalog;

    fn write(path: &Path, body: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    fn one_message(id: &str, text: &str) -> String {
        format!(
            r#"{{"language":"en-US","messages":[{{"id":"{id}","message":"{text}","translation":""}}]}}"#
        )
    }

    #[tokio::test]
    async fn test_mirrors_nested_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(
            &root.join("locales/en-US/a/b.gotext.json"),
            &one_message("greeting", "Hello, World!"),
        );
        write(
            &root.join("locales/en-US/top.gotext.json"),
            &one_message("bye", "Bye"),
        );
        // Generated output and non-catalog files are ignored.
        write(
            &root.join("locales/en-US/out.gotext.json"),
            &one_message("ignored", "Ignored"),
        );
        write(&root.join("locales/en-US/notes.txt"), "not a catalog");

        let t = ScriptedTranslator::new(&[("Hello, World!", "Привет, Мир!"), ("Bye", "Пока")]);
        let req = SyncRequest::new("ru-RU", false);
        let report = sync_locales(root, None, &req, &t, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            report,
            BatchReport {
                files_processed: 2,
                files_failed: 0,
                messages_translated: 2,
            }
        );

        let nested = Catalog::read(&root.join("locales/ru-RU/a/b.gotext.json")).unwrap();
        assert_eq!(nested.language, "ru-RU");
        assert_eq!(nested.messages[0].id, "greeting");
        assert_eq!(nested.messages[0].translation, "Привет, Мир!");
        assert!(root.join("locales/ru-RU/top.gotext.json").exists());
        assert!(!root.join("locales/ru-RU/out.gotext.json").exists());
        assert!(!t.texts().contains(&"Ignored".to_string()));
    }

    #[tokio::test]
    async fn test_bad_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(&root.join("locales/en-US/a.gotext.json"), "{ not json");
        write(
            &root.join("locales/en-US/b.gotext.json"),
            &one_message("ok", "Fine"),
        );

        let t = ScriptedTranslator::new(&[("Fine", "Gut")]);
        let report = sync_locales(
            root,
            None,
            &SyncRequest::new("de-DE", false),
            &t,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.files_processed, 1);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.messages_translated, 1);
        assert!(!root.join("locales/de-DE/a.gotext.json").exists());
        assert!(root.join("locales/de-DE/b.gotext.json").exists());
    }

    #[tokio::test]
    async fn test_second_run_translates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(
            &root.join("locales/en-US/m.gotext.json"),
            &one_message("greeting", "Hello"),
        );
        let t = ScriptedTranslator::new(&[("Hello", "Hallo")]);
        let req = SyncRequest::new("de-DE", false);
        let cancel = CancellationToken::new();

        let first = sync_locales(root, None, &req, &t, &cancel).await.unwrap();
        let second = sync_locales(root, None, &req, &t, &cancel).await.unwrap();
        assert_eq!(first.messages_translated, 1);
        assert_eq!(second.messages_translated, 0);
        assert_eq!(second.files_processed, 1);
    }

    #[tokio::test]
    async fn test_cancellation_propagates() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(
            &root.join("locales/en-US/m.gotext.json"),
            &one_message("a", "A"),
        );
        let cancel = CancellationToken::new();
        let t = CancellingTranslator(cancel.clone());

        let err = sync_locales(root, None, &SyncRequest::new("ru-RU", false), &t, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, GotextError::Cancelled));
        assert!(!root.join("locales/ru-RU/m.gotext.json").exists());
    }

    #[test]
    fn test_source_dir_selection_is_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        for lang in ["fr-FR", "en-US", "de-DE", "ru-RU"] {
            std::fs::create_dir_all(base.join(lang)).unwrap();
        }
        std::fs::write(base.join("README.md"), "x").unwrap();

        assert_eq!(
            select_source_dir(base, "de-DE", None).unwrap(),
            base.join("en-US")
        );
        assert_eq!(
            select_source_dir(base, "ru-RU", None).unwrap(),
            base.join("de-DE")
        );
        assert_eq!(
            select_source_dir(base, "ru-RU", Some("fr-FR")).unwrap(),
            base.join("fr-FR")
        );
    }

    #[test]
    fn test_source_dir_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        std::fs::create_dir_all(base.join("ru-RU")).unwrap();

        assert!(matches!(
            select_source_dir(base, "ru-RU", None),
            Err(GotextError::Config(_))
        ));
        assert!(matches!(
            select_source_dir(base, "ru-RU", Some("en-US")),
            Err(GotextError::Config(_))
        ));
        assert!(matches!(
            select_source_dir(base, "ru-RU", Some("ru-RU")),
            Err(GotextError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_locales_dir_has_no_source() {
        let tmp = tempfile::tempdir().unwrap();
        let err = sync_locales(
            tmp.path(),
            None,
            &SyncRequest::new("ru-RU", false),
            &ScriptedTranslator::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("no source language directories"));
        assert!(!tmp.path().join("locales").exists());
    }

    #[tokio::test]
    async fn test_bad_source_lang_leaves_no_target_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(
            &root.join("locales/en-US/m.gotext.json"),
            &one_message("a", "A"),
        );
        let t = ScriptedTranslator::default();
        let cancel = CancellationToken::new();
        let req = SyncRequest::new("ru-RU", false);

        for source_lang in ["fr-FR", "ru-RU"] {
            let err = sync_locales(root, Some(source_lang), &req, &t, &cancel)
                .await
                .unwrap_err();
            assert!(matches!(err, GotextError::Config(_)));
        }
        assert!(!root.join("locales/ru-RU").exists());
        assert!(t.texts().is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_target_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(
            &root.join("locales/en-US/a.gotext.json"),
            &one_message("first", "One"),
        );
        write(
            &root.join("locales/en-US/b.gotext.json"),
            &one_message("second", "Two"),
        );
        // A directory where the target catalog should go.
        std::fs::create_dir_all(root.join("locales/de-DE/a.gotext.json")).unwrap();

        let t = ScriptedTranslator::new(&[("One", "Eins"), ("Two", "Zwei")]);
        let report = sync_locales(
            root,
            None,
            &SyncRequest::new("de-DE", false),
            &t,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(
            report,
            BatchReport {
                files_processed: 1,
                files_failed: 1,
                messages_translated: 1,
            }
        );
        assert!(root.join("locales/de-DE/a.gotext.json").is_dir());
        let b = Catalog::read(&root.join("locales/de-DE/b.gotext.json")).unwrap();
        assert_eq!(b.messages[0].translation, "Zwei");
    }
}
