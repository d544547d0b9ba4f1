use thiserror::Error;

use krtrends_core::CoreError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{method} returned no trends")]
    Empty { method: String },

    #[error("no trending searches listed under any of: {regions}")]
    RegionNotFound { regions: String },

    /// Every method of the fallback chain failed; holds each method's message.
    #[error("all trend methods failed: {0}")]
    AllMethodsFailed(String),

    #[error(transparent)]
    Format(#[from] CoreError),
}
