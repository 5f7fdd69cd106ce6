//! tracing-subscriber setup: JSON lines by default, plain text with `--logtext`.

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG`, when set, overrides `level`.
pub fn init(level: &str, text: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(parse_level(level)?.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if text {
        builder.init();
    } else {
        builder.json().init();
    }
    Ok(())
}

fn parse_level(level: &str) -> anyhow::Result<LevelFilter> {
    match level.to_ascii_lowercase().as_str() {
        "debug" | "info" | "warn" | "error" => level
            .parse::<LevelFilter>()
            .with_context(|| format!("invalid log level: {level}")),
        _ => anyhow::bail!("invalid log level: {level} (expected debug, info, warn or error)"),
    }
}
