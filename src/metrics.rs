use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Only one recorder may exist per process.
    pub fn install() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        describe();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!("news_requests_total", "News fetch-and-classify requests.");
    describe_counter!("headlines_fetched_total", "Headlines returned by the source.");
    describe_counter!(
        "headline_source_errors_total",
        "Headline source failures (network, status, payload, missing key)."
    );
    describe_counter!(
        "classifications_total",
        "Classifier calls by outcome (labeled, fallback, failed)."
    );
    describe_histogram!("classify_duration_ms", "Classifier call time in milliseconds.");
}
