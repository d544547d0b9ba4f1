use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use krtrends_core::{AppConfig, ErrorEnvelope, ResponseEnvelope};
use krtrends_source::{collect_envelope, TrendsSource};

const SETUP_FAILURE: &str = "Failed to set up the Google Trends collector";

#[derive(Debug, Parser)]
#[command(name = "krtrends-cli")]
#[command(about = "Collect South Korean Google Trends once and print them as JSON")]
struct Cli {
    /// Upstream to collect from
    #[arg(long, value_enum, default_value_t = SourceKind::Scrape)]
    source: SourceKind,

    /// Maximum entries to emit, 0 for no cap (overrides KRTRENDS_MAX_ENTRIES)
    #[arg(long)]
    max_entries: Option<usize>,

    /// Pretty-print the JSON envelope
    #[arg(long)]
    pretty: bool,

    /// Log to stderr at KRTRENDS_LOG_LEVEL (RUST_LOG also enables logging)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// Trending-searches RSS feed
    Rss,
    /// Trends web API with realtime → today → trending fallback
    Scrape,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = run(&cli).await;
    emit(
        &result,
        cli.pretty,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )
}

/// Writes the envelope to `out` on success and the error envelope to `err`
/// on failure, returning the matching exit code.
fn emit(
    result: &Result<ResponseEnvelope, ErrorEnvelope>,
    pretty: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> ExitCode {
    match result {
        Ok(envelope) => match render(envelope, pretty) {
            Ok(json) => match writeln!(out, "{json}") {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            },
            Err(e) => {
                write_error(&ErrorEnvelope::new(e.to_string(), SETUP_FAILURE), pretty, err);
                ExitCode::FAILURE
            }
        },
        Err(error) => {
            write_error(error, pretty, err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ResponseEnvelope, ErrorEnvelope> {
    let config = krtrends_core::load_app_config().map_err(setup_failure)?;
    init_tracing(&config, cli.verbose);
    collect(cli, &config).await
}

async fn collect(cli: &Cli, config: &AppConfig) -> Result<ResponseEnvelope, ErrorEnvelope> {
    let source = build_source(cli.source, config).map_err(setup_failure)?;
    let max_entries = resolve_max_entries(cli.max_entries, config.max_entries);
    tracing::debug!(client = source.name(), ?max_entries, "collecting trends");

    collect_envelope(&source, max_entries).await
}

fn setup_failure(e: impl std::fmt::Display) -> ErrorEnvelope {
    ErrorEnvelope::new(e.to_string(), SETUP_FAILURE)
}

fn build_source(
    kind: SourceKind,
    config: &AppConfig,
) -> Result<TrendsSource, krtrends_source::SourceError> {
    match kind {
        SourceKind::Rss => TrendsSource::rss_from_config(config),
        SourceKind::Scrape => TrendsSource::scrape_from_config(config),
    }
}

/// Stdout carries only the envelope, so logs go to stderr and stay off
/// unless asked for.
fn init_tracing(config: &AppConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose {
            config.log_level.as_str()
        } else {
            "off"
        };
        EnvFilter::new(level)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// A flag value of `0` disables the cap; no flag keeps the configured cap.
fn resolve_max_entries(flag: Option<usize>, configured: Option<usize>) -> Option<usize> {
    match flag {
        Some(0) => None,
        Some(n) => Some(n),
        None => configured,
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn write_error(error: &ErrorEnvelope, pretty: bool, err: &mut impl Write) {
    let line = render(error, pretty).unwrap_or_else(|_| format!("{}: {}", error.message, error.error));
    let _ = writeln!(err, "{line}");
}

#[cfg(test)]
mod tests;
