// src/headlines/types.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, SourceError};

pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 20;
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const DEFAULT_CATEGORY: &str = "technology";
pub const DEFAULT_COUNTRY: &str = "us";

/// Categories accepted by the top-headlines endpoint.
pub const CATEGORIES: [&str; 7] = [
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadlineRecord {
    pub headline: String,
    pub url: Option<String>,
    pub source: Option<String>, // e.g., "Reuters", "The Verge"
}

/// Validated parameters for one source call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineQuery {
    pub category: String,
    pub country: String,
    pub page_size: u32,
}

impl Default for HeadlineQuery {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl HeadlineQuery {
    /// Normalizes case, checks category/country and clamps `page_size` into [1, 20].
    pub fn validated(category: &str, country: &str, page_size: i64) -> Result<Self, QueryError> {
        let category = category.trim().to_ascii_lowercase();
        if !CATEGORIES.iter().any(|c| *c == category) {
            return Err(QueryError::UnknownCategory(category));
        }
        let country = country.trim().to_ascii_lowercase();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(QueryError::InvalidCountry(country));
        }
        Ok(Self {
            category,
            country,
            page_size: clamp_page_size(page_size),
        })
    }
}

pub fn clamp_page_size(requested: i64) -> u32 {
    requested.clamp(MIN_PAGE_SIZE as i64, MAX_PAGE_SIZE as i64) as u32
}

#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// One upstream call. An empty result is `Ok(vec![])`, never an error.
    async fn fetch(&self, query: &HeadlineQuery) -> Result<Vec<HeadlineRecord>, SourceError>;
    fn name(&self) -> &'static str;
}
