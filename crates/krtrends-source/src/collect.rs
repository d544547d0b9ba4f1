//! Fetch-and-format: one upstream call turned into a response or error envelope.

use krtrends_core::{AppConfig, ErrorEnvelope, FetchedTrends, ResponseEnvelope};

use crate::error::SourceError;
use crate::http::ClientOptions;
use crate::rss::RssClient;
use crate::scrape::ScrapeClient;

/// The upstream a handler is wired to.
pub enum TrendsSource {
    Rss(RssClient),
    Scrape(ScrapeClient),
}

impl TrendsSource {
    /// Builds the RSS-backed source from application config.
    ///
    /// # Errors
    ///
    /// Propagates client construction errors.
    pub fn rss_from_config(config: &AppConfig) -> Result<Self, SourceError> {
        RssClient::new(ClientOptions::from_app_config(config), &config.rss_url).map(Self::Rss)
    }

    /// Builds the web-API-backed source from application config.
    ///
    /// # Errors
    ///
    /// Propagates client construction errors.
    pub fn scrape_from_config(config: &AppConfig) -> Result<Self, SourceError> {
        ScrapeClient::new(ClientOptions::from_app_config(config), &config.api_base_url)
            .map(Self::Scrape)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rss(_) => "rss",
            Self::Scrape(_) => "scrape",
        }
    }

    /// Static description placed in the `message` of an error envelope.
    #[must_use]
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Rss(_) => "Failed to fetch Google Trends data from the RSS feed",
            Self::Scrape(_) => "Failed to fetch Google Trends data from the trends API",
        }
    }

    /// # Errors
    ///
    /// Whatever the underlying client returns.
    pub async fn fetch(&self) -> Result<FetchedTrends, SourceError> {
        match self {
            Self::Rss(client) => client.fetch().await,
            Self::Scrape(client) => client.fetch_with_fallback().await,
        }
    }
}

/// Fetches once from `source` and formats the outcome.
///
/// Every failure (transport, parsing, empty result) collapses into an
/// [`ErrorEnvelope`] carrying the error's message.
///
/// # Errors
///
/// Returns the [`ErrorEnvelope`] to send when anything fails.
pub async fn collect_envelope(
    source: &TrendsSource,
    max_entries: Option<usize>,
) -> Result<ResponseEnvelope, ErrorEnvelope> {
    match try_collect(source, max_entries).await {
        Ok(envelope) => {
            tracing::info!(
                client = source.name(),
                source = %envelope.source,
                total = envelope.total,
                "trends collected"
            );
            Ok(envelope)
        }
        Err(e) => {
            tracing::error!(client = source.name(), error = %e, "trend collection failed");
            Err(ErrorEnvelope::new(e.to_string(), source.failure_message()))
        }
    }
}

async fn try_collect(
    source: &TrendsSource,
    max_entries: Option<usize>,
) -> Result<ResponseEnvelope, SourceError> {
    let fetched = source.fetch().await?;
    tracing::info!(
        source = %fetched.source,
        count = fetched.records.len(),
        "fetched trend records"
    );
    Ok(ResponseEnvelope::from_fetched(fetched, max_entries)?)
}
