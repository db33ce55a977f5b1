//! News Topic Classifier: binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and metrics.

use news_topic_classifier::{api, config::AppConfig, logging, metrics::Metrics, AppState};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    logging::init_tracing();

    let cfg = AppConfig::load()?;
    let state = AppState::from_config(&cfg)?;
    let metrics = Metrics::install()?;

    let router = api::router(state).merge(metrics.router());
    tracing::info!("news topic classifier ready");

    Ok(router.into())
}
