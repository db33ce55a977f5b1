// src/api.rs
//! HTTP surface: routes, shared state and request/response shapes.

use std::any::Any;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::classify::TopicClassifier;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::headlines::{
    fetch_headlines, FixtureSource, HeadlineQuery, HeadlineSource, NewsApiSource,
    DEFAULT_CATEGORY, DEFAULT_COUNTRY, DEFAULT_PAGE_SIZE,
};
use crate::pipeline::{classify_headlines, prepare_headline, ClassifiedHeadline};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn HeadlineSource>,
    pub classifier: Arc<TopicClassifier>,
    /// Max in-flight classifications per request.
    pub concurrency: usize,
}

impl AppState {
    pub fn new(source: Arc<dyn HeadlineSource>, classifier: Arc<TopicClassifier>) -> Self {
        Self {
            source,
            classifier,
            concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Wire the real collaborators. The model itself is built lazily on first use.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let source: Arc<dyn HeadlineSource> = match &cfg.news.fixture_path {
            Some(path) => {
                let payload = std::fs::read_to_string(path)
                    .with_context(|| format!("reading headline fixture {}", path.display()))?;
                info!(path = %path.display(), "serving headlines from fixture");
                Arc::new(FixtureSource::from_fixture(&payload))
            }
            None => {
                let src = NewsApiSource::new(&cfg.news)?;
                if !src.has_api_key() {
                    error!("NEWS_API_KEY not found in environment variables");
                }
                Arc::new(src)
            }
        };
        let classifier = Arc::new(TopicClassifier::from_config(&cfg.classifier));
        info!(
            mode = ?cfg.classifier.mode,
            concurrency = cfg.classifier.concurrency,
            "classifier configured"
        );
        Ok(Self::new(source, classifier).with_concurrency(cfg.classifier.concurrency))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/news", post(fetch_and_classify))
        .route("/fetch-and-classify", post(fetch_and_classify))
        .route("/classify", post(classify_one))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}
fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

#[derive(Debug, Deserialize)]
struct NewsReq {
    #[serde(default = "default_category")]
    category: String,
    #[serde(default = "default_country")]
    country: String,
    /// Absent or `null` means the default page size.
    #[serde(default)]
    page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
struct NewsMeta {
    count: usize,
    successful: usize,
    category: String,
}

#[derive(Debug, Serialize)]
struct NewsResp {
    meta: NewsMeta,
    results: Vec<ClassifiedHeadline>,
}

async fn fetch_and_classify(
    State(state): State<AppState>,
    payload: Result<Json<NewsReq>, JsonRejection>,
) -> AppResult<Json<NewsResp>> {
    counter!("news_requests_total").increment(1);
    let Json(body) = payload?;

    let requested = body.page_size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE));
    let query = HeadlineQuery::validated(&body.category, &body.country, requested)?;
    if i64::from(query.page_size) != requested {
        warn!(
            requested,
            used = query.page_size,
            "page_size out of range; clamped"
        );
    }
    info!(category = %query.category, country = %query.country, page_size = query.page_size, "fetching news");

    let headlines = fetch_headlines(state.source.as_ref(), &query).await?;
    let agg = classify_headlines(&state.classifier, headlines, state.concurrency).await;

    info!(count = agg.count, successful = agg.successful, "classified headlines");
    Ok(Json(NewsResp {
        meta: NewsMeta {
            count: agg.count,
            successful: agg.successful,
            category: query.category,
        },
        results: agg.results,
    }))
}

#[derive(Debug, Deserialize)]
struct ClassifyReq {
    /// Anything that is not a JSON string is treated as invalid input.
    #[serde(default)]
    headline: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ClassifyResp {
    headline: String,
    topic: String,
    confidence: f64,
}

async fn classify_one(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyReq>, JsonRejection>,
) -> AppResult<Json<ClassifyResp>> {
    let Json(body) = payload?;
    let headline = body.headline.as_str().unwrap_or_default().to_string();
    let res = state
        .classifier
        .classify_or_fallback(&prepare_headline(&headline))
        .await;
    Ok(Json(ClassifyResp {
        headline,
        topic: res.topic,
        confidence: res.confidence,
    }))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    // The payload may carry paths or secrets; it stays in the logs.
    error!(%detail, "handler panicked");
    AppError::Internal("unexpected error".to_string()).into_response()
}
