//! Shared data model, envelope formatting and configuration for krtrends.

pub mod app_config;
pub mod config;
pub mod envelope;
pub mod error;
pub mod types;

pub use app_config::AppConfig;
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use envelope::{build_entries, ErrorEnvelope, ResponseEnvelope};
pub use error::{ConfigError, CoreError};
pub use types::{FetchedTrends, NewsArticle, TrendEntry, TrendRecord, COUNTRY};
