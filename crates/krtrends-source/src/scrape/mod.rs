//! Client for the unofficial JSON endpoints behind the Google Trends web UI.
//!
//! These endpoints change without notice, so [`ScrapeClient::fetch_with_fallback`]
//! walks [`TrendMethod::CHAIN`] and returns the first method that yields terms.

mod responses;

use reqwest::{Client, Url};

use krtrends_core::{FetchedTrends, TrendRecord};

use crate::error::SourceError;
use crate::http::{build_client, get_text, parse_url, ClientOptions};
use responses::{parse_guarded, region_terms, DailyResponse, RealtimeResponse};

const GEO: &str = "KR";
const HOST_LANGUAGE: &str = "ko";
/// Timezone offset in minutes, as the web UI sends it for Korea.
const TZ_OFFSET: &str = "540";
const JSON_ACCEPT: &str = "application/json, text/plain, */*";

/// Region keys tried, in order, against the hot-trends payload.
pub const REGION_SPELLINGS: [&str; 3] = ["south_korea", "korea", "KR"];

/// One way of asking the web API for trending terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMethod {
    /// Realtime stories (`/trends/api/realtimetrends`).
    Realtime,
    /// Today's daily searches (`/trends/api/dailytrends`).
    Today,
    /// Hot-trends list keyed by region name.
    Trending,
}

impl TrendMethod {
    pub const CHAIN: [Self; 3] = [Self::Realtime, Self::Today, Self::Trending];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::Today => "today",
            Self::Trending => "trending",
        }
    }

    #[must_use]
    pub fn source_tag(self) -> &'static str {
        match self {
            Self::Realtime => "google_trends_realtime",
            Self::Today => "google_trends_today",
            Self::Trending => "google_trends_trending",
        }
    }
}

/// Client for the Trends web API.
///
/// Use [`ScrapeClient::new`] with `https://trends.google.com` in production or
/// a mock server origin in tests.
pub struct ScrapeClient {
    client: Client,
    options: ClientOptions,
    base_url: Url,
}

impl ScrapeClient {
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if `base_url` does not parse, or
    /// [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(options: ClientOptions, base_url: &str) -> Result<Self, SourceError> {
        let client = build_client(&options)?;
        // Trailing slash so `join` appends instead of replacing the last segment.
        let base_url = parse_url(&format!("{}/", base_url.trim_end_matches('/')))?;
        Ok(Self {
            client,
            options,
            base_url,
        })
    }

    /// Tries each method of [`TrendMethod::CHAIN`] in order.
    ///
    /// The first method returning at least one term wins and its tag becomes
    /// the `source` of the result. Failures of earlier methods are logged only.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::AllMethodsFailed`] listing every method's error
    /// when none succeeds.
    pub async fn fetch_with_fallback(&self) -> Result<FetchedTrends, SourceError> {
        let mut failures = Vec::with_capacity(TrendMethod::CHAIN.len());

        for method in TrendMethod::CHAIN {
            match self.fetch_method(method).await {
                Ok(records) => {
                    tracing::debug!(
                        method = method.label(),
                        count = records.len(),
                        "trend method succeeded"
                    );
                    return Ok(FetchedTrends {
                        source: method.source_tag().to_owned(),
                        records,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        method = method.label(),
                        error = %e,
                        "trend method failed, trying next"
                    );
                    failures.push(format!("{}: {e}", method.label()));
                }
            }
        }

        Err(SourceError::AllMethodsFailed(failures.join("; ")))
    }

    /// Runs a single method.
    ///
    /// # Errors
    ///
    /// Transport and decoding errors, or [`SourceError::Empty`] /
    /// [`SourceError::RegionNotFound`] when the method yields no terms.
    pub async fn fetch_method(&self, method: TrendMethod) -> Result<Vec<TrendRecord>, SourceError> {
        let records = match method {
            TrendMethod::Realtime => self.realtime_trends().await?,
            TrendMethod::Today => self.today_trends().await?,
            TrendMethod::Trending => self.trending_searches().await?,
        };

        if records.iter().all(|r| r.term.trim().is_empty()) {
            return Err(SourceError::Empty {
                method: method.label().to_owned(),
            });
        }
        Ok(records)
    }

    async fn realtime_trends(&self) -> Result<Vec<TrendRecord>, SourceError> {
        let url = self.build_url(
            "trends/api/realtimetrends",
            &[
                ("hl", HOST_LANGUAGE),
                ("tz", TZ_OFFSET),
                ("cat", "all"),
                ("fi", "0"),
                ("fs", "0"),
                ("geo", GEO),
                ("ri", "300"),
                ("rs", "20"),
                ("sort", "0"),
            ],
        )?;
        let body = get_text(&self.client, &self.options, &url, JSON_ACCEPT).await?;
        let response: RealtimeResponse = parse_guarded(&body, "realtimetrends")?;
        Ok(response.into_records())
    }

    async fn today_trends(&self) -> Result<Vec<TrendRecord>, SourceError> {
        let url = self.build_url(
            "trends/api/dailytrends",
            &[
                ("hl", HOST_LANGUAGE),
                ("tz", TZ_OFFSET),
                ("geo", GEO),
                ("ns", "15"),
            ],
        )?;
        let body = get_text(&self.client, &self.options, &url, JSON_ACCEPT).await?;
        let response: DailyResponse = parse_guarded(&body, "dailytrends")?;
        Ok(response.into_records())
    }

    /// Fetches the hot-trends payload once and resolves it under each of
    /// [`REGION_SPELLINGS`].
    async fn trending_searches(&self) -> Result<Vec<TrendRecord>, SourceError> {
        let url = self.build_url("trends/hottrends/visualize/internal/data", &[])?;
        let body = get_text(&self.client, &self.options, &url, JSON_ACCEPT).await?;
        let payload: serde_json::Value = parse_guarded(&body, "hottrends")?;

        for region in REGION_SPELLINGS {
            if let Some(records) = region_terms(&payload, region) {
                tracing::debug!(region, "resolved hot-trends region");
                return Ok(records);
            }
        }

        Err(SourceError::RegionNotFound {
            regions: REGION_SPELLINGS.join(", "),
        })
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, SourceError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| SourceError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }
}
