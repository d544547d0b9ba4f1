//! Google Trends clients for South Korean trending searches.
//!
//! Two upstreams are supported: the public trending-searches RSS feed
//! ([`RssClient`]) and the unofficial JSON endpoints behind the Trends web UI
//! ([`ScrapeClient`]), which are tried as a realtime → today → trending
//! fallback chain. [`collect_envelope`] runs one client and formats the
//! outcome as a response or error envelope.

pub mod collect;
pub mod error;
pub mod http;
pub mod rss;
pub mod scrape;

mod retry;

pub use collect::{collect_envelope, TrendsSource};
pub use error::SourceError;
pub use http::ClientOptions;
pub use rss::{parse_trends_feed, RssClient, RSS_SOURCE_TAG};
pub use scrape::{ScrapeClient, TrendMethod, REGION_SPELLINGS};
