mod commands;
mod logging;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "gotext-translate",
    version,
    about = "Translate untranslated strings in gotext localization files using LLM"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    loglevel: String,

    /// Log in text format, otherwise JSON.
    #[arg(long, global = true)]
    logtext: bool,

    /// Force rewrite existing translations.
    #[arg(long, global = true)]
    force_rewrite: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a single gotext localization file.
    Translate {
        /// Source file path.
        #[arg(long)]
        source: PathBuf,
        /// Target language (e.g., ru-RU).
        #[arg(long)]
        target_lang: String,
        /// Output file path (defaults to out.gotext.json next to the source).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Translate all gotext localization files in a directory structure.
    TranslateDir {
        /// Project directory containing locales/<lang>/.
        #[arg(long)]
        dir: PathBuf,
        /// Target language (e.g., ru-RU).
        #[arg(long)]
        target_lang: String,
        /// Source language directory to translate from (defaults to the first other language).
        #[arg(long)]
        source_lang: Option<String>,
    },
    /// List available translation providers.
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.loglevel, cli.logtext)?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    match cli.command {
        Commands::Translate {
            source,
            target_lang,
            output,
        } => {
            commands::translate_file(
                cli.config.as_deref(),
                &source,
                output.as_deref(),
                &commands::request(target_lang, cli.force_rewrite)?,
                &cancel,
            )
            .await
        }
        Commands::TranslateDir {
            dir,
            target_lang,
            source_lang,
        } => {
            commands::translate_dir(
                cli.config.as_deref(),
                &dir,
                source_lang.as_deref(),
                &commands::request(target_lang, cli.force_rewrite)?,
                &cancel,
            )
            .await
        }
        Commands::Providers => {
            commands::list_providers();
            Ok(())
        }
    }
}

/// Cancel `token` on SIGINT or SIGTERM.
async fn cancel_on_signal(token: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    warn!("received shutdown signal, cancelling");
    token.cancel();
}
