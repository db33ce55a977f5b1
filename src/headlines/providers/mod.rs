// src/headlines/providers/mod.rs
pub mod fixture;
pub mod newsapi;

pub use fixture::FixtureSource;
pub use newsapi::{parse_top_headlines, NewsApiSource};
