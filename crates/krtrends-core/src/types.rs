use serde::{Deserialize, Serialize};

/// Country tag stamped on every emitted entry.
pub const COUNTRY: &str = "south_korea";

/// A news article attached to a trending term by the upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewsArticle {
    pub headline: String,
    pub url: Option<String>,
    pub source: Option<String>,
}

/// One trending term as returned by an upstream client, before ranking.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrendRecord {
    /// Display term (the search query that is trending).
    pub term: String,
    /// Approximate search volume, e.g. `"1000+"`.
    pub traffic: Option<String>,
    pub picture: Option<String>,
    /// Related articles in upstream order. The first one is the headline.
    pub articles: Vec<NewsArticle>,
}

impl TrendRecord {
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }
}

/// Records from one upstream call, tagged with the method that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedTrends {
    pub source: String,
    pub records: Vec<TrendRecord>,
}

/// A normalized, ranked trend as emitted in the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub keyword: String,
    /// 1-based position in source order.
    pub rank: usize,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}
