//! Subcommand handlers. Each one loads config, builds the translator once,
//! and hands an explicit request to the sync engine.

use anyhow::Context;
use gotext_core::{
    catalog::GENERATED_FILE_NAME,
    config::{self, Config},
    traits::Translator,
};
use gotext_providers::ProviderRegistry;
use gotext_sync::{sync_file, sync_locales, SyncRequest};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Validate CLI input into a request.
pub fn request(target_lang: String, force_rewrite: bool) -> anyhow::Result<SyncRequest> {
    let target_lang = target_lang.trim().to_string();
    if target_lang.is_empty() {
        anyhow::bail!("target language is required");
    }
    Ok(SyncRequest::new(target_lang, force_rewrite))
}

/// Load config and build the configured translator. Fails before any file is touched.
fn prepare_translator(config_path: Option<&Path>) -> anyhow::Result<Box<dyn Translator>> {
    let cfg = config::load(config_path).context("failed to initialize config")?;
    translator_from_config(&cfg)
}

fn translator_from_config(cfg: &Config) -> anyhow::Result<Box<dyn Translator>> {
    let registry = ProviderRegistry::with_builtin_providers();
    let translator = registry
        .create_translator(&cfg.llm.provider, &cfg.llm.provider_options())
        .context("failed to initialize translator")?;
    info!(provider = translator.name(), "translator ready");
    Ok(translator)
}

/// Where single-file mode writes when no output path is given.
fn default_output_path(source: &Path) -> PathBuf {
    source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(GENERATED_FILE_NAME)
}

/// `translate`: reconcile one file. Any file error aborts the run.
pub async fn translate_file(
    config_path: Option<&Path>,
    source: &Path,
    output: Option<&Path>,
    request: &SyncRequest,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let translator = prepare_translator(config_path)?;
    run_file(translator.as_ref(), source, output, request, cancel).await
}

async fn run_file(
    translator: &dyn Translator,
    source: &Path,
    output: Option<&Path>,
    request: &SyncRequest,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let output = output.map_or_else(|| default_output_path(source), Path::to_path_buf);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }

    info!(
        file = %source.display(),
        target_lang = %request.target_lang,
        "starting translation"
    );

    let report = sync_file(source, &output, request, translator, cancel).await?;

    info!(
        file = %report.source.display(),
        output = %report.target.display(),
        processed = report.translated,
        failed = report.failed.len(),
        "translation completed"
    );
    Ok(())
}

/// `translate-dir`: reconcile every catalog under `<dir>/locales/<source>/`.
pub async fn translate_dir(
    config_path: Option<&Path>,
    dir: &Path,
    source_lang: Option<&str>,
    request: &SyncRequest,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let translator = prepare_translator(config_path)?;
    sync_locales(dir, source_lang, request, translator.as_ref(), cancel).await?;
    Ok(())
}

/// `providers`: print registered provider names.
pub fn list_providers() {
    println!("{}", providers_listing(&ProviderRegistry::with_builtin_providers()));
}

fn providers_listing(registry: &ProviderRegistry) -> String {
    let names = registry.names();
    if names.is_empty() {
        return "No translation providers registered".to_string();
    }

    let mut out = String::from("Available translation providers:\n");
    for name in names {
        out.push_str(&format!("  - {name}\n"));
    }
    out.push_str(
        "\nConfigure the provider in the [llm] section of your config file \
         or with LLM_PROVIDER, LLM_API_KEY and LLM_MODEL.",
    );
    out
}
