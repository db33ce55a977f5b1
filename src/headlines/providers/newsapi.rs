// src/headlines/providers/newsapi.rs
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::NewsApiConfig;
use crate::error::SourceError;
use crate::headlines::normalize_headline;
use crate::headlines::types::{HeadlineQuery, HeadlineRecord, HeadlineSource};

#[derive(Debug, Deserialize)]
struct TopHeadlines {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Option<Vec<Article>>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    source: Option<ArticleSource>,
    title: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

/// Parse a top-headlines payload into at most `page_size` records.
/// Articles without a usable title or url are skipped.
pub fn parse_top_headlines(
    body: &[u8],
    page_size: u32,
) -> Result<Vec<HeadlineRecord>, SourceError> {
    let payload: TopHeadlines =
        serde_json::from_slice(body).map_err(|e| SourceError::Malformed(e.to_string()))?;

    match payload.status.as_str() {
        "ok" => {}
        "error" => {
            return Err(SourceError::Provider {
                code: payload.code.unwrap_or_else(|| "unknown".to_string()),
                message: payload.message.unwrap_or_default(),
            })
        }
        other => return Err(SourceError::Malformed(format!("unexpected status '{other}'"))),
    }

    let articles = payload
        .articles
        .ok_or_else(|| SourceError::Malformed("missing 'articles'".to_string()))?;

    let total = articles.len();
    let mut skipped = 0usize;
    let mut out = Vec::with_capacity(total.min(page_size as usize));
    for a in articles {
        if out.len() >= page_size as usize {
            break;
        }
        let headline = a.title.as_deref().map(normalize_headline).unwrap_or_default();
        let url = a
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let Some(url) = url else {
            skipped += 1;
            continue;
        };
        if headline.is_empty() {
            skipped += 1;
            continue;
        }
        let source = a
            .source
            .and_then(|s| s.name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        out.push(HeadlineRecord {
            headline,
            url: Some(url),
            source,
        });
    }

    if skipped > 0 {
        tracing::debug!(total, skipped, kept = out.len(), "skipped articles without title or url");
    }
    Ok(out)
}

/// Client for the NewsAPI `top-headlines` endpoint.
pub struct NewsApiSource {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl NewsApiSource {
    pub fn new(cfg: &NewsApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("news-topic-classifier/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building news api http client")?;
        Ok(Self {
            http,
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl HeadlineSource for NewsApiSource {
    async fn fetch(&self, query: &HeadlineQuery) -> Result<Vec<HeadlineRecord>, SourceError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(SourceError::MissingApiKey);
        };

        let page_size = query.page_size.to_string();
        let resp = self
            .http
            .get(&self.endpoint)
            .header("X-Api-Key", key)
            .query(&[
                ("category", query.category.as_str()),
                ("country", query.country.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            // The provider usually explains itself in a JSON error body.
            let message = match parse_top_headlines(&body, query.page_size) {
                Err(SourceError::Provider { message, .. }) if !message.is_empty() => message,
                _ => String::from_utf8_lossy(&body).chars().take(200).collect(),
            };
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        parse_top_headlines(&body, query.page_size)
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}
