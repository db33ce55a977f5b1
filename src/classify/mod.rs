// src/classify/mod.rs
//! Topic classifier adapter: a fixed label set over a lazily-built zero-shot model.
//!
//! `TopicClassifier::classify` never fails. It reports what happened through
//! [`Classification`], so callers can tell a real label from a fallback or a failure.

pub mod hf_inference;
pub mod labels;
pub mod lazy;
pub mod model;

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::config::{ClassifierConfig, ClassifierMode};
use crate::logging::anon_hash;

pub use hf_inference::HfInferenceModel;
pub use labels::{is_known_topic, CANDIDATE_LABELS, ERROR_TOPIC, FALLBACK_TOPIC};
pub use lazy::LazyModel;
pub use model::{DynModel, FailingModel, MockModel, ZeroShotModel, ZeroShotOutput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub topic: String,
    /// Always within [0, 1].
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn fallback() -> Self {
        Self {
            topic: FALLBACK_TOPIC.to_string(),
            confidence: 0.0,
        }
    }

    pub fn error() -> Self {
        Self {
            topic: ERROR_TOPIC.to_string(),
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Top label from the model.
    Labeled(ClassificationResult),
    /// Input was empty; the model was not called.
    Fallback(ClassificationResult),
    /// Model could not be built or the call failed.
    Failed { error: String },
}

impl Classification {
    /// Adapter-level view: failures collapse to the "General News" fallback.
    pub fn result(&self) -> ClassificationResult {
        match self {
            Classification::Labeled(r) | Classification::Fallback(r) => r.clone(),
            Classification::Failed { .. } => ClassificationResult::fallback(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Classification::Failed { .. })
    }

    fn outcome(&self) -> &'static str {
        match self {
            Classification::Labeled(_) => "labeled",
            Classification::Fallback(_) => "fallback",
            Classification::Failed { .. } => "failed",
        }
    }
}

pub struct TopicClassifier {
    model: LazyModel,
    labels: Vec<&'static str>,
}

impl TopicClassifier {
    pub fn new(model: LazyModel) -> Self {
        Self {
            model,
            labels: CANDIDATE_LABELS.to_vec(),
        }
    }

    /// Wrap an already-built model.
    pub fn with_model(model: DynModel) -> Self {
        Self::new(LazyModel::ready(model))
    }

    /// Pick the model according to config. The remote model is only built on first use.
    pub fn from_config(cfg: &ClassifierConfig) -> Self {
        match cfg.mode {
            ClassifierMode::Mock => {
                Self::with_model(Arc::new(MockModel::new(CANDIDATE_LABELS[0], 0.9)))
            }
            ClassifierMode::Error => Self::with_model(Arc::new(FailingModel {
                reason: "classifier disabled by CLASSIFIER_TEST_MODE=error".to_string(),
            })),
            ClassifierMode::Remote => {
                let cfg = cfg.clone();
                Self::new(LazyModel::new(move || {
                    Ok(Arc::new(HfInferenceModel::new(&cfg)?) as DynModel)
                }))
            }
        }
    }

    pub fn is_model_initialized(&self) -> bool {
        self.model.is_initialized()
    }

    pub async fn classify(&self, text: &str) -> Classification {
        let t0 = std::time::Instant::now();
        let out = self.classify_inner(text).await;
        histogram!("classify_duration_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("classifications_total", "outcome" => out.outcome()).increment(1);
        out
    }

    /// `(topic, confidence)` with every failure folded into the fallback.
    pub async fn classify_or_fallback(&self, text: &str) -> ClassificationResult {
        self.classify(text).await.result()
    }

    async fn classify_inner(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            warn!("invalid headline received");
            return Classification::Fallback(ClassificationResult::fallback());
        }

        let model = match self.model.get().await {
            Ok(m) => m,
            Err(e) => {
                error!(error = %e, "zero-shot model initialization failed");
                return Classification::Failed {
                    error: format!("model unavailable: {e}"),
                };
            }
        };

        let picked = match model.classify(text, &self.labels).await {
            Ok(out) => self.pick_top(&out),
            Err(e) => Err(format!("{e:#}")),
        };
        match picked {
            Ok(r) => Classification::Labeled(r),
            Err(e) => {
                error!(id = %anon_hash(text), model = model.name(), error = %e, "classification failed");
                Classification::Failed { error: e }
            }
        }
    }

    fn pick_top(&self, out: &ZeroShotOutput) -> Result<ClassificationResult, String> {
        let (label, score) = out
            .top()
            .ok_or_else(|| "model returned no labels".to_string())?;
        if !self.labels.iter().any(|l| *l == label) {
            return Err(format!("model returned unknown label '{label}'"));
        }
        if !score.is_finite() {
            return Err(format!("model returned non-finite score for '{label}'"));
        }
        Ok(ClassificationResult {
            topic: label.to_string(),
            confidence: score.clamp(0.0, 1.0),
        })
    }
}
