// src/config/news.rs
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/top-headlines";

fn default_endpoint() -> String {
    DEFAULT_NEWS_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Usually supplied through `NEWS_API_KEY` rather than the file.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Serve a canned top-headlines payload instead of calling the provider.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            fixture_path: None,
        }
    }
}

impl NewsApiConfig {
    pub(crate) fn apply_env(&mut self, get: &dyn Fn(&str) -> Option<String>) {
        if let Some(v) = get("NEWS_API_URL") {
            self.endpoint = v;
        }
        if let Some(v) = get("NEWS_API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = get("NEWS_FIXTURE_PATH") {
            self.fixture_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("NEWS_API_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_secs = v.max(1);
        }
        // An empty key in the file counts as absent.
        if self.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            self.api_key = None;
        }
    }
}
