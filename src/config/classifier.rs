// src/config/classifier.rs
use serde::Deserialize;

pub const DEFAULT_CLASSIFIER_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-mnli";

fn default_endpoint() -> String {
    DEFAULT_CLASSIFIER_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_concurrency() -> usize {
    1
}

/// Which model backs the classifier.
/// `mock` and `error` exist for local runs and tests without a model endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    #[default]
    Remote,
    Mock,
    Error,
}

impl ClassifierMode {
    /// Case-insensitive; unknown values mean `Remote`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => ClassifierMode::Mock,
            "error" => ClassifierMode::Error,
            _ => ClassifierMode::Remote,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Max in-flight classifications per request. 1 = sequential.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub mode: ClassifierMode,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            mode: ClassifierMode::default(),
        }
    }
}

impl ClassifierConfig {
    pub(crate) fn apply_env(&mut self, get: &dyn Fn(&str) -> Option<String>) {
        if let Some(v) = get("CLASSIFIER_URL") {
            self.endpoint = v;
        }
        if let Some(v) = get("HF_API_TOKEN") {
            self.api_token = Some(v);
        }
        if let Some(v) = get("CLASSIFIER_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_secs = v.max(1);
        }
        if let Some(v) = get("CLASSIFY_CONCURRENCY").and_then(|s| s.parse::<usize>().ok()) {
            self.concurrency = v;
        }
        if let Some(v) = get("CLASSIFIER_TEST_MODE") {
            self.mode = ClassifierMode::parse(&v);
        }
        self.concurrency = self.concurrency.clamp(1, 16);
    }
}
