//! Integration tests for the `ScrapeClient` fallback chain.
//!
//! Each test mounts a subset of the three Trends web API endpoints on a
//! wiremock server; unmounted paths answer 404, which counts as a failure of
//! that method.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use krtrends_source::{ClientOptions, ScrapeClient, SourceError, TrendMethod};

const REALTIME_PATH: &str = "/trends/api/realtimetrends";
const DAILY_PATH: &str = "/trends/api/dailytrends";
const HOTTRENDS_PATH: &str = "/trends/hottrends/visualize/internal/data";

fn test_client(base_url: &str) -> ScrapeClient {
    let options = ClientOptions {
        user_agent: "krtrends-test/0.1".to_owned(),
        request_timeout_secs: 5,
        connect_timeout_secs: 5,
        max_retries: 0,
        backoff_base_ms: 0,
    };
    ScrapeClient::new(options, base_url).expect("client construction should not fail")
}

fn guarded(body: &serde_json::Value) -> String {
    format!(")]}}',\n{body}")
}

fn realtime_body(titles: &[&str]) -> serde_json::Value {
    let stories: Vec<serde_json::Value> = titles
        .iter()
        .map(|t| {
            json!({
                "title": t,
                "entityNames": [t],
                "articles": [{"articleTitle": format!("{t} 속보"), "url": "https://news.example.kr", "source": "KBS"}]
            })
        })
        .collect();
    json!({"storySummaries": {"trendingStories": stories}})
}

fn daily_body(queries: &[&str]) -> serde_json::Value {
    let searches: Vec<serde_json::Value> = queries
        .iter()
        .map(|q| json!({"title": {"query": q}, "formattedTraffic": "10K+", "articles": []}))
        .collect();
    json!({"default": {"trendingSearchesDays": [{"trendingSearches": searches}]}})
}

#[tokio::test]
async fn realtime_success_short_circuits_the_chain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(REALTIME_PATH))
        .and(query_param("geo", "KR"))
        .and(query_param("hl", "ko"))
        .and(query_param("tz", "540"))
        .respond_with(ResponseTemplate::new(200).set_body_string(guarded(&realtime_body(&[
            "한국시리즈",
            "아이유",
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DAILY_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fetched = test_client(&server.uri())
        .fetch_with_fallback()
        .await
        .expect("realtime should succeed");

    assert_eq!(fetched.source, "google_trends_realtime");
    assert_eq!(fetched.records.len(), 2);
    assert_eq!(fetched.records[0].articles[0].headline, "한국시리즈 속보");
}

#[tokio::test]
async fn falls_back_to_today_when_realtime_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(REALTIME_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DAILY_PATH))
        .and(query_param("ns", "15"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(guarded(&daily_body(&["날씨", "환율"]))),
        )
        .mount(&server)
        .await;

    let fetched = test_client(&server.uri())
        .fetch_with_fallback()
        .await
        .expect("today should succeed");

    assert_eq!(fetched.source, TrendMethod::Today.source_tag());
    assert_eq!(fetched.records[0].term, "날씨");
    assert_eq!(fetched.records[1].traffic.as_deref(), Some("10K+"));
}

#[tokio::test]
async fn empty_realtime_counts_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(REALTIME_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(guarded(&realtime_body(&[]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DAILY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(guarded(&daily_body(&["뉴스"]))))
        .mount(&server)
        .await;

    let fetched = test_client(&server.uri())
        .fetch_with_fallback()
        .await
        .expect("today should succeed");

    assert_eq!(fetched.source, "google_trends_today");
}

#[tokio::test]
async fn trending_resolves_alternate_region_spelling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOTTRENDS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "japan": ["東京"],
            "korea": ["부산", "대구", "광주"]
        })))
        .mount(&server)
        .await;

    let fetched = test_client(&server.uri())
        .fetch_with_fallback()
        .await
        .expect("trending should succeed");

    assert_eq!(fetched.source, "google_trends_trending");
    assert_eq!(fetched.records.len(), 3);
    assert_eq!(fetched.records[0].term, "부산");
    assert!(fetched.records[0].articles.is_empty());
}

#[tokio::test]
async fn all_methods_failing_yields_composite_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(REALTIME_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DAILY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(")]}'\n<html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(HOTTRENDS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"japan": ["東京"]})))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_with_fallback()
        .await
        .expect_err("every method fails");

    let SourceError::AllMethodsFailed(ref detail) = err else {
        panic!("expected AllMethodsFailed, got {err:?}");
    };
    assert!(detail.contains("realtime: unexpected HTTP status 429"), "{detail}");
    assert!(detail.contains("today: JSON deserialization error"), "{detail}");
    assert!(detail.contains("trending: no trending searches listed under any of: south_korea, korea, KR"), "{detail}");
    assert!(err.to_string().starts_with("all trend methods failed: "));
}

#[tokio::test]
async fn fetch_method_runs_a_single_method() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOTTRENDS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"south_korea": ["서울"]})))
        .expect(1)
        .mount(&server)
        .await;

    let records = test_client(&server.uri())
        .fetch_method(TrendMethod::Trending)
        .await
        .expect("trending should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].term, "서울");
}
