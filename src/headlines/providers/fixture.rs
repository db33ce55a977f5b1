// src/headlines/providers/fixture.rs
use async_trait::async_trait;

use crate::error::SourceError;
use crate::headlines::providers::newsapi::parse_top_headlines;
use crate::headlines::types::{HeadlineQuery, HeadlineRecord, HeadlineSource};

/// Serves a canned top-headlines payload. Used for offline runs and tests.
pub struct FixtureSource {
    pub payload: String,
}

impl FixtureSource {
    pub fn from_fixture(content: &str) -> Self {
        Self {
            payload: content.to_string(),
        }
    }
}

#[async_trait]
impl HeadlineSource for FixtureSource {
    async fn fetch(&self, query: &HeadlineQuery) -> Result<Vec<HeadlineRecord>, SourceError> {
        parse_top_headlines(self.payload.as_bytes(), query.page_size)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
