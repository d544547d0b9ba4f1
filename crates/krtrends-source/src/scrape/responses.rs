//! Response shapes of the Trends web API and their conversion to records.

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value;

use krtrends_core::{NewsArticle, TrendRecord};

use crate::error::SourceError;

/// Strips the `)]}'` anti-XSSI guard Google prepends to JSON bodies.
pub(crate) fn strip_xssi_prefix(body: &str) -> &str {
    let trimmed = body.trim_start();
    match trimmed.strip_prefix(")]}'") {
        Some(rest) => rest.trim_start_matches(',').trim_start(),
        None => trimmed,
    }
}

/// Deserializes a guarded JSON body.
pub(crate) fn parse_guarded<T: serde::de::DeserializeOwned>(
    body: &str,
    context: &str,
) -> Result<T, SourceError> {
    serde_json::from_str(strip_xssi_prefix(body)).map_err(|e| SourceError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

/// Article titles from the JSON API carry HTML entities.
fn decode_entities(text: &str) -> String {
    quick_xml::escape::unescape(text)
        .map_or_else(|_| text.to_owned(), Cow::into_owned)
        .trim()
        .to_owned()
}

// ---------------------------------------------------------------------------
// realtimetrends
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RealtimeResponse {
    pub story_summaries: StorySummaries,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StorySummaries {
    #[serde(default)]
    pub trending_stories: Vec<TrendingStory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrendingStory {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub entity_names: Vec<String>,
    #[serde(default)]
    pub articles: Vec<RealtimeArticle>,
    #[serde(default)]
    pub image: Option<StoryImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RealtimeArticle {
    #[serde(default)]
    pub article_title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoryImage {
    #[serde(default)]
    pub img_url: Option<String>,
}

impl RealtimeResponse {
    pub(crate) fn into_records(self) -> Vec<TrendRecord> {
        self.story_summaries
            .trending_stories
            .into_iter()
            .map(|story| {
                // Story titles join several entities; fall back to the first one.
                let term = if story.title.trim().is_empty() {
                    story.entity_names.into_iter().next().unwrap_or_default()
                } else {
                    story.title
                };
                TrendRecord {
                    term: term.trim().to_owned(),
                    traffic: None,
                    picture: story.image.and_then(|i| i.img_url),
                    articles: story
                        .articles
                        .into_iter()
                        .map(|a| NewsArticle {
                            headline: decode_entities(&a.article_title),
                            url: a.url,
                            source: a.source,
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// dailytrends
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct DailyResponse {
    pub default: DailyDefault,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DailyDefault {
    #[serde(default)]
    pub trending_searches_days: Vec<TrendingDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrendingDay {
    #[serde(default)]
    pub trending_searches: Vec<DailySearch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DailySearch {
    pub title: DailyTitle,
    #[serde(default)]
    pub formatted_traffic: Option<String>,
    #[serde(default)]
    pub articles: Vec<DailyArticle>,
    #[serde(default)]
    pub image: Option<DailyImage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DailyTitle {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DailyArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DailyImage {
    #[serde(default)]
    pub image_url: Option<String>,
}

impl DailyResponse {
    /// Only the most recent day is used.
    pub(crate) fn into_records(self) -> Vec<TrendRecord> {
        let Some(today) = self.default.trending_searches_days.into_iter().next() else {
            return Vec::new();
        };

        today
            .trending_searches
            .into_iter()
            .map(|search| TrendRecord {
                term: search.title.query.trim().to_owned(),
                traffic: search.formatted_traffic,
                picture: search.image.and_then(|i| i.image_url),
                articles: search
                    .articles
                    .into_iter()
                    .map(|a| NewsArticle {
                        headline: decode_entities(&a.title),
                        url: a.url,
                        source: a.source,
                    })
                    .collect(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// hottrends/visualize/internal/data
// ---------------------------------------------------------------------------

/// Looks up the term list for `region` in the hot-trends payload.
///
/// The payload is an object keyed by region name, each value a list of terms.
/// Returns `None` when the key is missing, not a list, or has no terms.
pub(crate) fn region_terms(payload: &Value, region: &str) -> Option<Vec<TrendRecord>> {
    let terms = payload.get(region)?.as_array()?;
    let records: Vec<TrendRecord> = terms
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(TrendRecord::new)
        .collect();

    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}
