// src/headlines/mod.rs
//! Headline source adapter: provider trait, NewsAPI client and text normalization.

pub mod providers;
pub mod types;

use crate::error::SourceError;
use metrics::counter;

pub use providers::{FixtureSource, NewsApiSource};
pub use types::*;

/// Headlines longer than this are cut before they leave the adapter.
pub const MAX_HEADLINE_CHARS: usize = 500;

/// Normalize headline text: decode entities, strip tags, fold quotes, collapse whitespace.
pub fn normalize_headline(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    if out.chars().count() > MAX_HEADLINE_CHARS {
        out = out.chars().take(MAX_HEADLINE_CHARS).collect();
    }

    out
}

/// Fetch one page of headlines through `source`, with telemetry.
pub async fn fetch_headlines(
    source: &dyn HeadlineSource,
    query: &HeadlineQuery,
) -> Result<Vec<HeadlineRecord>, SourceError> {
    let t0 = std::time::Instant::now();
    match source.fetch(query).await {
        Ok(records) => {
            counter!("headlines_fetched_total").increment(records.len() as u64);
            tracing::info!(
                provider = source.name(),
                category = %query.category,
                country = %query.country,
                page_size = query.page_size,
                fetched = records.len(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "fetched headlines"
            );
            Ok(records)
        }
        Err(e) => {
            counter!("headline_source_errors_total").increment(1);
            tracing::warn!(error = %e, provider = source.name(), "headline source error");
            Err(e)
        }
    }
}
