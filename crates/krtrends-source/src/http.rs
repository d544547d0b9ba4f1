//! Shared `reqwest` client construction and GET helper.

use std::time::Duration;

use reqwest::{header, Client, Url};

use krtrends_core::AppConfig;

use crate::error::SourceError;
use crate::retry::retry_with_backoff;

/// Connection options handed to every upstream client at construction.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Additional attempts after the first failure. `0` disables retries.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl ClientOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            request_timeout_secs: config.request_timeout_secs,
            connect_timeout_secs: config.connect_timeout_secs,
            max_retries: config.max_retries,
            backoff_base_ms: config.backoff_base_ms,
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: "krtrends/0.1 (trend-collector)".to_owned(),
            request_timeout_secs: 25,
            connect_timeout_secs: 10,
            max_retries: 2,
            backoff_base_ms: 100,
        }
    }
}

pub(crate) fn build_client(options: &ClientOptions) -> Result<Client, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(options.request_timeout_secs))
        .connect_timeout(Duration::from_secs(options.connect_timeout_secs))
        .user_agent(options.user_agent.as_str())
        .build()?;
    Ok(client)
}

pub(crate) fn parse_url(raw: &str) -> Result<Url, SourceError> {
    Url::parse(raw).map_err(|e| SourceError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// GETs `url` and returns the body, retrying transient failures.
///
/// # Errors
///
/// - [`SourceError::UnexpectedStatus`] for any non-2xx status.
/// - [`SourceError::Http`] on network failure after all retries.
pub(crate) async fn get_text(
    client: &Client,
    options: &ClientOptions,
    url: &Url,
    accept: &'static str,
) -> Result<String, SourceError> {
    retry_with_backoff(options.max_retries, options.backoff_base_ms, || async move {
        let response = client
            .get(url.clone())
            .header(header::ACCEPT, accept)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok::<_, SourceError>(response.text().await?)
    })
    .await
}
