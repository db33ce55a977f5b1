// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot, with stub
// headline sources and models standing in for NewsAPI and the zero-shot endpoint.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use news_topic_classifier::classify::{MockModel, ZeroShotModel, ZeroShotOutput};
use news_topic_classifier::config::NewsApiConfig;
use news_topic_classifier::error::SourceError;
use news_topic_classifier::headlines::{FixtureSource, NewsApiSource};
use news_topic_classifier::{api, AppState, HeadlineQuery, HeadlineRecord, HeadlineSource, TopicClassifier};

const BODY_LIMIT: usize = 1024 * 1024;
const FIXTURE: &str = include_str!("fixtures/top_headlines.json");

/// Picks a label by keyword; headlines containing "fail" make the call error out.
struct KeywordModel;

#[async_trait]
impl ZeroShotModel for KeywordModel {
    async fn classify(&self, text: &str, labels: &[&str]) -> Result<ZeroShotOutput> {
        let lower = text.to_ascii_lowercase();
        if lower.contains("fail") {
            anyhow::bail!("inference backend error");
        }
        let pick = if lower.contains("bank") || lower.contains("rates") {
            "Business & Finance"
        } else if lower.contains("championship") {
            "Sports & Athletics"
        } else if lower.contains("genome") {
            "Science & Research"
        } else {
            "Technology & Computing"
        };
        Ok(ZeroShotOutput::from_pairs(
            labels
                .iter()
                .map(|l| (l.to_string(), if *l == pick { 0.91 } else { 0.01 }))
                .collect(),
        ))
    }
    fn name(&self) -> &'static str {
        "keyword"
    }
}

/// Returns fixed records and remembers the query it was called with.
struct RecordingSource {
    records: Vec<HeadlineRecord>,
    seen: Mutex<Option<HeadlineQuery>>,
}

impl RecordingSource {
    fn new(headlines: &[&str]) -> Arc<Self> {
        let records = headlines
            .iter()
            .enumerate()
            .map(|(i, h)| HeadlineRecord {
                headline: h.to_string(),
                url: Some(format!("https://example.test/{i}")),
                source: Some("Stub".to_string()),
            })
            .collect();
        Arc::new(Self {
            records,
            seen: Mutex::new(None),
        })
    }

    fn last_query(&self) -> Option<HeadlineQuery> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HeadlineSource for RecordingSource {
    async fn fetch(&self, query: &HeadlineQuery) -> Result<Vec<HeadlineRecord>, SourceError> {
        *self.seen.lock().unwrap() = Some(query.clone());
        Ok(self.records.clone())
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

struct DownSource;

#[async_trait]
impl HeadlineSource for DownSource {
    async fn fetch(&self, _query: &HeadlineQuery) -> Result<Vec<HeadlineRecord>, SourceError> {
        Err(SourceError::Status {
            status: 500,
            message: "upstream exploded".to_string(),
        })
    }
    fn name(&self) -> &'static str {
        "down"
    }
}

fn app_with(source: Arc<dyn HeadlineSource>, model: Arc<dyn ZeroShotModel>) -> Router {
    let classifier = Arc::new(TopicClassifier::with_model(model));
    api::router(AppState::new(source, classifier))
}

fn fixture_app() -> Router {
    app_with(
        Arc::new(FixtureSource::from_fixture(FIXTURE)),
        Arc::new(KeywordModel),
    )
}

async fn post_json(app: &Router, uri: &str, payload: Json) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST");
    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("parse json");
    (status, v)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = fixture_app();
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap().trim(), "OK");
}

#[tokio::test]
async fn news_with_defaults_returns_meta_and_ordered_results() {
    let app = fixture_app();
    let (status, v) = post_json(&app, "/news", json!({})).await;
    assert_eq!(status, StatusCode::OK, "body: {v}");

    assert_eq!(v["meta"]["category"], "technology");
    assert_eq!(v["meta"]["count"], 4);
    assert_eq!(v["meta"]["successful"], 4);

    let results = v["results"].as_array().expect("results array");
    let headlines: Vec<&str> = results.iter().map(|r| r["headline"].as_str().unwrap()).collect();
    assert_eq!(
        headlines,
        vec![
            "Nvidia unveils new AI chips for data centers",
            "Central bank holds rates steady as inflation cools",
            "Underdogs win the championship in overtime thriller",
            "Researchers map \"dark\" genome regions",
        ]
    );
    let topics: Vec<&str> = results.iter().map(|r| r["topic"].as_str().unwrap()).collect();
    assert_eq!(
        topics,
        vec![
            "Technology & Computing",
            "Business & Finance",
            "Sports & Athletics",
            "Science & Research",
        ]
    );
    for r in results {
        assert_eq!(r["success"], true);
        assert!(r.get("error").is_none());
        assert!(!r["url"].as_str().unwrap().is_empty());
        let c = r["confidence"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&c));
    }
    assert_eq!(results[0]["source"], "The Verge");
}

#[tokio::test]
async fn fetch_and_classify_alias_serves_the_same_pipeline() {
    let app = fixture_app();
    let (status, v) = post_json(
        &app,
        "/fetch-and-classify",
        json!({ "category": "general", "page_size": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["meta"]["category"], "general");
    assert_eq!(v["meta"]["count"], 2);
}

#[tokio::test]
async fn page_size_is_clamped_before_the_source_call() {
    let src = RecordingSource::new(&["One", "Two"]);
    let app = app_with(src.clone(), Arc::new(KeywordModel));

    let (status, _) = post_json(&app, "/news", json!({ "page_size": 25 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(src.last_query().unwrap().page_size, 20);

    let (status, _) = post_json(&app, "/news", json!({ "page_size": 0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(src.last_query().unwrap().page_size, 1);

    let (_, _) = post_json(&app, "/news", json!({ "country": "GB", "category": "Sports" })).await;
    let q = src.last_query().unwrap();
    assert_eq!((q.country.as_str(), q.category.as_str(), q.page_size), ("gb", "sports", 5));
}

#[tokio::test]
async fn per_item_failure_is_folded_into_the_batch() {
    let src = RecordingSource::new(&["Chips rally", "Pipeline fails here", "Cup championship"]);
    let app = app_with(src, Arc::new(KeywordModel));

    let (status, v) = post_json(&app, "/news", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["meta"]["count"], 3);
    assert_eq!(v["meta"]["successful"], 2);

    let failed = &v["results"][1];
    assert_eq!(failed["headline"], "Pipeline fails here");
    assert_eq!(failed["topic"], "Classification Error");
    assert_eq!(failed["confidence"], 0.0);
    assert_eq!(failed["success"], false);
    assert!(failed["error"].as_str().unwrap().contains("inference backend error"));

    assert_eq!(v["results"][2]["topic"], "Sports & Athletics");
}

#[tokio::test]
async fn source_failure_is_a_single_dependency_error() {
    let app = app_with(Arc::new(DownSource), Arc::new(KeywordModel));
    let (status, v) = post_json(&app, "/news", json!({})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["error"], "source_unavailable");
    assert!(v["detail"].as_str().unwrap().contains("News fetching failed"));
    assert!(v.get("results").is_none());
}

#[tokio::test]
async fn missing_api_key_fails_fast_with_503() {
    let cfg = NewsApiConfig {
        endpoint: "http://127.0.0.1:9/top-headlines".into(),
        ..Default::default()
    };
    let src = NewsApiSource::new(&cfg).unwrap();
    let app = app_with(Arc::new(src), Arc::new(KeywordModel));

    let (status, v) = post_json(&app, "/news", json!({})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(v["error"], "source_not_configured");
}

#[tokio::test]
async fn invalid_category_or_country_is_400() {
    let app = fixture_app();
    let (status, v) = post_json(&app, "/news", json!({ "category": "gossip" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"], "bad_request");

    let (status, _) = post_json(&app, "/news", json!({ "country": "usa" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn classify_single_headline_and_fallbacks() {
    let app = fixture_app();

    let (status, v) = post_json(&app, "/classify", json!({ "headline": "Central bank cuts rates" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["topic"], "Business & Finance");
    assert_eq!(v["headline"], "Central bank cuts rates");

    for payload in [json!({ "headline": "" }), json!({ "headline": 42 }), json!({})] {
        let (status, v) = post_json(&app, "/classify", payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["topic"], "General News");
        assert_eq!(v["confidence"], 0.0);
    }

    // Model failure never surfaces as an error status on this endpoint.
    let (status, v) = post_json(&app, "/classify", json!({ "headline": "this will fail" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["topic"], "General News");
}

#[tokio::test]
async fn classification_is_deterministic_for_a_deterministic_model() {
    let app = app_with(
        RecordingSource::new(&["a"]),
        Arc::new(MockModel::new("Health & Medicine", 0.64)),
    );
    let (_, a) = post_json(&app, "/classify", json!({ "headline": "Flu season starts early" })).await;
    let (_, b) = post_json(&app, "/classify", json!({ "headline": "Flu season starts early" })).await;
    assert_eq!(a, b);
    assert_eq!(a["topic"], "Health & Medicine");
}

#[tokio::test]
async fn cors_mirrors_request_origin() {
    let app = fixture_app();
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let allow = resp
        .headers()
        .get("access-control-allow-origin")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    assert_eq!(allow, "http://localhost:3000");
}

/// Panics with something that must never reach a client.
struct PanickingSource;

#[async_trait]
impl HeadlineSource for PanickingSource {
    async fn fetch(&self, _query: &HeadlineQuery) -> Result<Vec<HeadlineRecord>, SourceError> {
        panic!("db password=hunter2 at /srv/secret.rs");
    }
    fn name(&self) -> &'static str {
        "panicking"
    }
}

async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    payload: &'static str,
) -> (StatusCode, Json) {
    let mut req = Request::builder().method("POST").uri(uri);
    if let Some(ct) = content_type {
        req = req.header("content-type", ct);
    }
    let resp = app
        .clone()
        .oneshot(req.body(Body::from(payload)).expect("build POST"))
        .await
        .expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("error body is json");
    (status, v)
}

#[tokio::test]
async fn malformed_bodies_get_json_400s() {
    let app = fixture_app();
    let cases: [(&str, Option<&str>, &'static str); 5] = [
        ("/news", Some("application/json"), r#"{"page_size":"ten"}"#),
        ("/news", Some("application/json"), r#"{"page_size":25.5}"#),
        ("/news", Some("application/json"), "not json"),
        ("/news", None, ""),
        ("/classify", Some("application/json"), "{headline"),
    ];
    for (uri, ct, payload) in cases {
        let (status, v) = post_raw(&app, uri, ct, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {payload:?}: {v}");
        assert_eq!(v["error"], "bad_request");
        assert!(!v["detail"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn null_page_size_means_default() {
    let src = RecordingSource::new(&["One"]);
    let app = app_with(src.clone(), Arc::new(KeywordModel));

    let (status, _) = post_json(&app, "/news", json!({ "page_size": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(src.last_query().unwrap().page_size, 5);
}

#[tokio::test]
async fn panics_become_generic_500_without_the_payload() {
    let app = app_with(Arc::new(PanickingSource), Arc::new(KeywordModel));
    let (status, v) = post_json(&app, "/news", json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(v["error"], "server_error");
    let detail = v["detail"].as_str().unwrap();
    assert!(!detail.contains("hunter2") && !detail.contains("/srv"), "{detail}");

    // the service keeps answering afterwards
    let (status, _) = post_json(&app, "/classify", json!({ "headline": "Central bank cuts rates" })).await;
    assert_eq!(status, StatusCode::OK);
}
