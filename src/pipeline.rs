// src/pipeline.rs
//! Aggregation pipeline: classify a batch of headlines, keeping input order and
//! folding per-item failures into the result instead of aborting.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::classify::{Classification, ClassificationResult, TopicClassifier};
use crate::headlines::{HeadlineRecord, MAX_HEADLINE_CHARS};
use crate::logging::anon_hash;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedHeadline {
    pub headline: String,
    pub url: Option<String>,
    pub source: Option<String>,
    pub topic: String,
    pub confidence: f64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassifiedHeadline {
    fn new(rec: HeadlineRecord, res: ClassificationResult, error: Option<String>) -> Self {
        Self {
            headline: rec.headline,
            url: rec.url,
            source: rec.source,
            topic: res.topic,
            confidence: res.confidence,
            success: error.is_none(),
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResponse {
    pub count: usize,
    pub successful: usize,
    pub results: Vec<ClassifiedHeadline>,
}

impl AggregatedResponse {
    pub fn from_results(results: Vec<ClassifiedHeadline>) -> Self {
        Self {
            count: results.len(),
            successful: results.iter().filter(|r| r.success).count(),
            results,
        }
    }
}

/// Text actually sent to the model: trimmed and capped.
pub fn prepare_headline(s: &str) -> String {
    s.trim().chars().take(MAX_HEADLINE_CHARS).collect()
}

/// Classify every headline exactly once. At most `concurrency` calls are in flight;
/// output order always matches input order.
pub async fn classify_headlines(
    classifier: &TopicClassifier,
    headlines: Vec<HeadlineRecord>,
    concurrency: usize,
) -> AggregatedResponse {
    let total = headlines.len();
    let results: Vec<ClassifiedHeadline> = stream::iter(headlines.into_iter().enumerate())
        .map(|(i, rec)| async move {
            let text = prepare_headline(&rec.headline);
            match classifier.classify(&text).await {
                Classification::Labeled(res) | Classification::Fallback(res) => {
                    info!(index = i + 1, total, id = %anon_hash(&text), topic = %res.topic, "processed headline");
                    ClassifiedHeadline::new(rec, res, None)
                }
                Classification::Failed { error } => {
                    warn!(index = i + 1, total, id = %anon_hash(&text), error = %error, "failed to classify headline");
                    ClassifiedHeadline::new(rec, ClassificationResult::error(), Some(error))
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    AggregatedResponse::from_results(results)
}
