use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so only malformed values fail.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for the first malformed value.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw)
        } else {
            Err(invalid(var, format!("expected an http(s) URL, got \"{raw}\"")))
        }
    };

    let bind_addr = parse_addr("KRTRENDS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("KRTRENDS_LOG_LEVEL", "info");
    let rss_url = parse_url(
        "KRTRENDS_RSS_URL",
        "https://trends.google.com/trending/rss?geo=KR",
    )?;
    let api_base_url = parse_url("KRTRENDS_API_BASE_URL", "https://trends.google.com")?;
    let user_agent = or_default("KRTRENDS_USER_AGENT", "krtrends/0.1 (trend-collector)");

    let request_timeout_secs = parse_u64("KRTRENDS_REQUEST_TIMEOUT_SECS", "25")?;
    let connect_timeout_secs = parse_u64("KRTRENDS_CONNECT_TIMEOUT_SECS", "10")?;
    let max_retries = parse_u32("KRTRENDS_MAX_RETRIES", "2")?;
    let backoff_base_ms = parse_u64("KRTRENDS_BACKOFF_BASE_MS", "100")?;

    let max_entries = parse_max_entries(&or_default(
        "KRTRENDS_MAX_ENTRIES",
        &crate::app_config::DEFAULT_MAX_ENTRIES.to_string(),
    ))
    .map_err(|reason| invalid("KRTRENDS_MAX_ENTRIES", reason))?;

    Ok(AppConfig {
        bind_addr,
        log_level,
        rss_url,
        api_base_url,
        user_agent,
        request_timeout_secs,
        connect_timeout_secs,
        max_retries,
        backoff_base_ms,
        max_entries,
    })
}

/// Parse the entry cap. `0` means unlimited.
pub(crate) fn parse_max_entries(raw: &str) -> Result<Option<usize>, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
