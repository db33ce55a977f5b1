// src/classify/hf_inference.rs
//! Zero-shot classification over the Hugging Face inference HTTP API
//! (default model: facebook/bart-large-mnli).

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::classify::model::{ZeroShotModel, ZeroShotOutput};
use crate::config::ClassifierConfig;

#[derive(Serialize)]
struct Req<'a> {
    inputs: &'a str,
    parameters: Params<'a>,
}

#[derive(Serialize)]
struct Params<'a> {
    candidate_labels: &'a [&'a str],
    multi_label: bool,
}

#[derive(Debug, Deserialize)]
struct Sequence {
    labels: Vec<String>,
    scores: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The endpoint has answered in each of these shapes over time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Resp {
    Single(Sequence),
    Pairs(Vec<LabelScore>),
    Batch(Vec<Sequence>),
}

#[derive(Debug, Deserialize)]
struct ErrResp {
    error: String,
}

pub fn parse_response(body: &[u8]) -> Result<ZeroShotOutput> {
    let resp: Resp = serde_json::from_slice(body).context("parsing zero-shot response")?;
    let (labels, scores) = match resp {
        Resp::Single(s) => (s.labels, s.scores),
        Resp::Batch(mut v) => {
            if v.is_empty() {
                bail!("empty batch in zero-shot response");
            }
            let s = v.swap_remove(0);
            (s.labels, s.scores)
        }
        Resp::Pairs(v) => v.into_iter().map(|p| (p.label, p.score)).unzip(),
    };
    if labels.is_empty() || labels.len() != scores.len() {
        bail!(
            "zero-shot response has {} labels and {} scores",
            labels.len(),
            scores.len()
        );
    }
    Ok(ZeroShotOutput::from_pairs(labels.into_iter().zip(scores).collect()))
}

pub struct HfInferenceModel {
    http: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HfInferenceModel {
    pub fn new(cfg: &ClassifierConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("news-topic-classifier/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building zero-shot http client")?;
        Ok(Self {
            http,
            endpoint: cfg.endpoint.clone(),
            api_token: cfg.api_token.clone(),
        })
    }
}

#[async_trait]
impl ZeroShotModel for HfInferenceModel {
    async fn classify(&self, text: &str, labels: &[&str]) -> Result<ZeroShotOutput> {
        let req = Req {
            inputs: text,
            parameters: Params {
                candidate_labels: labels,
                multi_label: false,
            },
        };

        let mut builder = self.http.post(&self.endpoint).json(&req);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        let resp = builder.send().await.context("zero-shot request")?;

        let status = resp.status();
        let body = resp.bytes().await.context("reading zero-shot response")?;
        if !status.is_success() {
            // e.g. 503 {"error":"Model facebook/bart-large-mnli is currently loading"}
            let detail = serde_json::from_slice::<ErrResp>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).chars().take(200).collect());
            bail!("zero-shot endpoint returned HTTP {}: {}", status.as_u16(), detail);
        }
        parse_response(&body)
    }

    fn name(&self) -> &'static str {
        "hf-inference"
    }
}
