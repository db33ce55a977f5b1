// src/classify/model.rs
//! Zero-shot model abstraction + stand-in models for tests and local runs.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Labels with their scores, highest score first.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroShotOutput {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ZeroShotOutput {
    /// Build from unordered (label, score) pairs.
    pub fn from_pairs(mut pairs: Vec<(String, f64)>) -> Self {
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (labels, scores) = pairs.into_iter().unzip();
        Self { labels, scores }
    }

    pub fn top(&self) -> Option<(&str, f64)> {
        let label = self.labels.first()?;
        let score = *self.scores.first()?;
        Some((label.as_str(), score))
    }
}

/// A zero-shot text classifier. Implementations do the remote call only;
/// fallbacks and label checks live in `TopicClassifier`.
#[async_trait]
pub trait ZeroShotModel: Send + Sync {
    async fn classify(&self, text: &str, labels: &[&str]) -> Result<ZeroShotOutput>;
    /// Model name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynModel = Arc<dyn ZeroShotModel>;

/// Always picks `label` with `score`; the remaining mass is spread over the other labels.
#[derive(Debug, Clone)]
pub struct MockModel {
    pub label: String,
    pub score: f64,
}

impl MockModel {
    pub fn new(label: &str, score: f64) -> Self {
        Self {
            label: label.to_string(),
            score,
        }
    }
}

#[async_trait]
impl ZeroShotModel for MockModel {
    async fn classify(&self, _text: &str, labels: &[&str]) -> Result<ZeroShotOutput> {
        let others = labels.iter().filter(|l| **l != self.label).count().max(1);
        let rest = ((1.0 - self.score) / others as f64).max(0.0);
        let pairs = labels
            .iter()
            .map(|l| {
                let s = if *l == self.label { self.score } else { rest };
                (l.to_string(), s)
            })
            .collect();
        Ok(ZeroShotOutput::from_pairs(pairs))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Fails every call.
#[derive(Debug, Clone)]
pub struct FailingModel {
    pub reason: String,
}

#[async_trait]
impl ZeroShotModel for FailingModel {
    async fn classify(&self, _text: &str, _labels: &[&str]) -> Result<ZeroShotOutput> {
        Err(anyhow!("{}", self.reason))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
