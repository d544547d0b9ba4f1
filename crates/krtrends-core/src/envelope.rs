//! Normalization of upstream trend records into the JSON response envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{FetchedTrends, TrendEntry, TrendRecord, COUNTRY};

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    pub data: Vec<TrendEntry>,
    /// Tag of the client method that produced `data`.
    pub source: String,
    pub cached: bool,
    pub total: usize,
    pub collected_at: DateTime<Utc>,
}

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub success: bool,
    /// Message of the underlying error.
    pub error: String,
    /// Static description of the failed operation.
    pub message: String,
    pub collected_at: DateTime<Utc>,
}

impl ResponseEnvelope {
    /// Ranks and truncates the fetched records into a success envelope.
    ///
    /// `max_entries` of `None` keeps every record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyResult`] when no record has a usable term.
    pub fn from_fetched(
        fetched: FetchedTrends,
        max_entries: Option<usize>,
    ) -> Result<Self, CoreError> {
        let data = build_entries(fetched.records, max_entries);
        if data.is_empty() {
            return Err(CoreError::EmptyResult {
                source_tag: fetched.source,
            });
        }

        Ok(Self {
            success: true,
            total: data.len(),
            data,
            source: fetched.source,
            cached: false,
            collected_at: Utc::now(),
        })
    }
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = "unknown error".to_string();
        }
        Self {
            success: false,
            error,
            message: message.into(),
            collected_at: Utc::now(),
        }
    }
}

/// Converts upstream records into ranked entries.
///
/// Records with a blank term are dropped before ranking, so ranks are always
/// `1..=len` without gaps. Order is preserved.
#[must_use]
pub fn build_entries(records: Vec<TrendRecord>, max_entries: Option<usize>) -> Vec<TrendEntry> {
    let cap = max_entries.unwrap_or(usize::MAX);

    records
        .into_iter()
        .filter_map(|record| {
            let keyword = record.term.trim().to_string();
            if keyword.is_empty() {
                None
            } else {
                Some((keyword, record))
            }
        })
        .take(cap)
        .enumerate()
        .map(|(idx, (keyword, record))| {
            let first_article = record.articles.into_iter().next();
            let (news_headline, news_url, news_source) = match first_article {
                Some(article) => (
                    non_blank(Some(article.headline)),
                    non_blank(article.url),
                    non_blank(article.source),
                ),
                None => (None, None, None),
            };

            TrendEntry {
                keyword,
                rank: idx + 1,
                country: COUNTRY.to_string(),
                traffic: non_blank(record.traffic),
                news_headline,
                news_url,
                news_source,
                picture: non_blank(record.picture),
            }
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
