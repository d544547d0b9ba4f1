use super::*;

#[test]
fn no_arguments_defaults_to_scrape() {
    let cli = Cli::try_parse_from(["krtrends-cli"]).expect("expected valid cli args");

    assert_eq!(cli.source, SourceKind::Scrape);
    assert_eq!(cli.max_entries, None);
    assert!(!cli.pretty);
    assert!(!cli.verbose);
}

#[test]
fn parses_rss_source() {
    let cli = Cli::try_parse_from(["krtrends-cli", "--source", "rss"])
        .expect("expected valid cli args");
    assert_eq!(cli.source, SourceKind::Rss);
}

#[test]
fn parses_max_entries_and_pretty() {
    let cli = Cli::try_parse_from(["krtrends-cli", "--max-entries", "5", "--pretty", "-v"])
        .expect("expected valid cli args");

    assert_eq!(cli.max_entries, Some(5));
    assert!(cli.pretty);
    assert!(cli.verbose);
}

#[test]
fn rejects_unknown_source() {
    let result = Cli::try_parse_from(["krtrends-cli", "--source", "bigquery"]);
    assert!(result.is_err());
}

#[test]
fn resolve_max_entries_prefers_flag() {
    assert_eq!(resolve_max_entries(Some(5), Some(20)), Some(5));
    assert_eq!(resolve_max_entries(Some(0), Some(20)), None);
    assert_eq!(resolve_max_entries(None, Some(20)), Some(20));
    assert_eq!(resolve_max_entries(None, None), None);
}

#[test]
fn error_envelope_renders_on_one_line() {
    let envelope = ErrorEnvelope::new("all trend methods failed: x", SETUP_FAILURE);
    let json = render(&envelope, false).expect("serialize");

    assert!(!json.contains('\n'));
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed["success"], false);
    assert_eq!(parsed["error"], "all trend methods failed: x");
    assert!(parsed["collectedAt"].is_string());
}

fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, krtrends_core::ConfigError> {
    let map: std::collections::HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    krtrends_core::build_app_config(|key| {
        map.get(key)
            .cloned()
            .ok_or(std::env::VarError::NotPresent)
    })
}

fn sample_envelope(n: usize) -> ResponseEnvelope {
    let records = (1..=n)
        .map(|i| krtrends_core::TrendRecord::new(format!("trend-{i}")))
        .collect();
    ResponseEnvelope::from_fetched(
        krtrends_core::FetchedTrends {
            source: "google_trends_rss".to_string(),
            records,
        },
        None,
    )
    .expect("non-empty records")
}

fn run_emit(result: &Result<ResponseEnvelope, ErrorEnvelope>) -> (ExitCode, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = emit(result, false, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).expect("utf8 stdout"),
        String::from_utf8(err).expect("utf8 stderr"),
    )
}

#[test]
fn success_goes_to_stdout_with_exit_zero() {
    let (code, out, err) = run_emit(&Ok(sample_envelope(3)));

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(err.is_empty());
    let parsed: serde_json::Value = serde_json::from_str(out.trim()).expect("stdout is json");
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["total"], 3);
    assert_eq!(parsed["data"][2]["rank"], 3);
}

#[test]
fn collection_failure_goes_to_stderr_with_exit_one() {
    let failure = ErrorEnvelope::new(
        "all trend methods failed: realtime: a; today: b; trending: c",
        "Failed to fetch Google Trends data from the trends API",
    );
    let (code, out, err) = run_emit(&Err(failure));

    assert_eq!(code, ExitCode::FAILURE);
    assert!(out.is_empty());
    let parsed: serde_json::Value = serde_json::from_str(err.trim()).expect("stderr is json");
    assert_eq!(parsed["success"], false);
    assert!(parsed["error"]
        .as_str()
        .expect("error string")
        .starts_with("all trend methods failed"));
}

#[test]
fn config_failure_is_reported_as_error_envelope() {
    let result = config_from(&[("KRTRENDS_RSS_URL", "ftp://trends.example.com/rss")])
        .map(|_| sample_envelope(1))
        .map_err(setup_failure);
    let (code, out, err) = run_emit(&result);

    assert_eq!(code, ExitCode::FAILURE);
    assert!(out.is_empty());
    let parsed: serde_json::Value = serde_json::from_str(err.trim()).expect("stderr is json");
    assert_eq!(parsed["success"], false);
    assert_eq!(parsed["message"], SETUP_FAILURE);
    assert!(parsed["error"]
        .as_str()
        .expect("error string")
        .contains("KRTRENDS_RSS_URL"));
}

#[tokio::test]
async fn rss_collection_emits_capped_envelope() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    let items: String = (1..=25)
        .map(|i| format!("<item><title>trend-{i}</title></item>"))
        .collect();
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<rss><channel>{items}</channel></rss>")),
        )
        .mount(&server)
        .await;

    let rss_url = format!("{}/rss", server.uri());
    let config = config_from(&[
        ("KRTRENDS_RSS_URL", rss_url.as_str()),
        ("KRTRENDS_MAX_RETRIES", "0"),
    ])
    .expect("valid config");
    let cli = Cli::try_parse_from(["krtrends-cli", "--source", "rss"]).expect("valid cli args");

    let (code, out, err) = run_emit(&collect(&cli, &config).await);

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(err.is_empty());
    let parsed: serde_json::Value = serde_json::from_str(out.trim()).expect("stdout is json");
    assert_eq!(parsed["source"], "google_trends_rss");
    assert_eq!(parsed["total"], 20);
    assert_eq!(parsed["data"][0]["keyword"], "trend-1");
}

#[tokio::test]
async fn rss_upstream_error_exits_one() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let config = config_from(&[
        ("KRTRENDS_RSS_URL", server.uri().as_str()),
        ("KRTRENDS_MAX_RETRIES", "0"),
    ])
    .expect("valid config");
    let cli = Cli::try_parse_from(["krtrends-cli", "--source", "rss"]).expect("valid cli args");

    let (code, out, err) = run_emit(&collect(&cli, &config).await);

    assert_eq!(code, ExitCode::FAILURE);
    assert!(out.is_empty());
    let parsed: serde_json::Value = serde_json::from_str(err.trim()).expect("stderr is json");
    assert_eq!(
        parsed["message"],
        "Failed to fetch Google Trends data from the RSS feed"
    );
}
