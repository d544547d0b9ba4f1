//! Google Trends trending-searches RSS feed.
//!
//! Each `<item>` is one trending term. Google adds an `ht:` namespace with
//! the approximate traffic, a picture and nested `<ht:news_item>` blocks.

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, Url};

use krtrends_core::{FetchedTrends, NewsArticle, TrendRecord};

use crate::error::SourceError;
use crate::http::{build_client, get_text, parse_url, ClientOptions};

/// Source tag reported for data produced by the RSS feed.
pub const RSS_SOURCE_TAG: &str = "google_trends_rss";

const RSS_ACCEPT: &str = "application/rss+xml, application/xml, text/xml, */*";

/// Client for the trending-searches RSS feed.
pub struct RssClient {
    client: Client,
    options: ClientOptions,
    feed_url: Url,
}

impl RssClient {
    /// Creates a client for the feed at `feed_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if `feed_url` does not parse, or
    /// [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(options: ClientOptions, feed_url: &str) -> Result<Self, SourceError> {
        let client = build_client(&options)?;
        let feed_url = parse_url(feed_url)?;
        Ok(Self {
            client,
            options,
            feed_url,
        })
    }

    #[must_use]
    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }

    /// Downloads and parses the feed.
    ///
    /// # Errors
    ///
    /// - [`SourceError::UnexpectedStatus`] / [`SourceError::Http`] on transport failure.
    /// - [`SourceError::Xml`] if the body is not well-formed XML.
    /// - [`SourceError::Empty`] if the feed has no items with a title.
    pub async fn fetch(&self) -> Result<FetchedTrends, SourceError> {
        let body = get_text(&self.client, &self.options, &self.feed_url, RSS_ACCEPT).await?;
        let records = parse_trends_feed(&body)?;

        if records.iter().all(|r| r.term.trim().is_empty()) {
            return Err(SourceError::Empty {
                method: "rss".to_owned(),
            });
        }

        Ok(FetchedTrends {
            source: RSS_SOURCE_TAG.to_owned(),
            records,
        })
    }
}

/// Parses a trending-searches RSS document into [`TrendRecord`]s, in feed order.
///
/// News items are kept in feed order, including ones without a headline.
/// The five predefined XML entities are decoded; text with any other entity
/// is kept as written.
///
/// # Errors
///
/// Returns [`SourceError::Xml`] on malformed XML.
pub fn parse_trends_feed(xml: &str) -> Result<Vec<TrendRecord>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut record: Option<TrendRecord> = None;
    let mut article: Option<NewsArticle> = None;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match name.as_str() {
                    "item" => {
                        record = Some(TrendRecord::default());
                        article = None;
                    }
                    "ht:news_item" if record.is_some() => {
                        article = Some(NewsArticle::default());
                    }
                    _ => {}
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"item" => {
                        if let Some(done) = record.take() {
                            records.push(done);
                        }
                    }
                    b"ht:news_item" => {
                        if let (Some(parent), Some(done)) = (record.as_mut(), article.take()) {
                            parent.articles.push(done);
                        }
                    }
                    _ => {}
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .unwrap_or_else(|_| String::from_utf8_lossy(e.as_ref()));
                apply_text(&mut record, &mut article, &current_tag, &text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                apply_text(&mut record, &mut article, &current_tag, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SourceError::Xml(e)),
            _ => {}
        }
    }

    for record in &mut records {
        record.term = record.term.trim().to_owned();
        for article in &mut record.articles {
            article.headline = article.headline.trim().to_owned();
        }
    }

    Ok(records)
}

fn apply_text(
    record: &mut Option<TrendRecord>,
    article: &mut Option<NewsArticle>,
    tag: &str,
    text: &str,
) {
    let Some(record) = record.as_mut() else {
        return;
    };

    if let Some(article) = article.as_mut() {
        match tag {
            "ht:news_item_title" => article.headline.push_str(text),
            "ht:news_item_url" => append(&mut article.url, text),
            "ht:news_item_source" => append(&mut article.source, text),
            _ => {}
        }
        return;
    }

    match tag {
        "title" => record.term.push_str(text),
        "ht:approx_traffic" => append(&mut record.traffic, text),
        "ht:picture" => append(&mut record.picture, text),
        _ => {}
    }
}

fn append(slot: &mut Option<String>, text: &str) {
    slot.get_or_insert_with(String::new).push_str(text);
}
