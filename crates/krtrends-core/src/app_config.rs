use std::net::SocketAddr;

/// Default cap on emitted entries.
pub const DEFAULT_MAX_ENTRIES: usize = 20;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Full URL of the trending-searches RSS feed.
    pub rss_url: String,
    /// Origin of the Google Trends web API (`/trends/api/...`).
    pub api_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    /// `None` disables truncation.
    pub max_entries: Option<usize>,
}
