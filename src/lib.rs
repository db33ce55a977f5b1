// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod headlines;
pub mod logging;
pub mod metrics;
pub mod pipeline;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::classify::{Classification, ClassificationResult, TopicClassifier};
pub use crate::headlines::{HeadlineQuery, HeadlineRecord, HeadlineSource};
pub use crate::pipeline::{classify_headlines, AggregatedResponse, ClassifiedHeadline};

use axum::Router;

/// Build the full router from `AppConfig::load()` (file + environment).
/// Metrics are not mounted here; the recorder is process-global and owned by the binary.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = config::AppConfig::load()?;
    let state = AppState::from_config(&cfg)?;
    Ok(router(state))
}
