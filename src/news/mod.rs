//! NewsAPI access: parameter bags, response records and the HTTP client.

mod client;
mod params;
mod types;

pub use client::NewsApiClient;
pub use params::{EverythingParams, QueryPairs, QueryParams, SourcesParams, TopHeadlinesParams};
pub use types::{Article, ArticleSource, ArticlesResponse, Source, SourcesResponse};

use crate::error::Result;
use async_trait::async_trait;

/// The three NewsAPI operations used by the agent tools.
#[async_trait]
pub trait NewsApi: Send + Sync {
    /// Live top and breaking headlines.
    async fn top_headlines(&self, params: &TopHeadlinesParams) -> Result<ArticlesResponse>;

    /// Search across all indexed articles.
    async fn everything(&self, params: &EverythingParams) -> Result<ArticlesResponse>;

    /// Publishers available for top headlines.
    async fn sources(&self, params: &SourcesParams) -> Result<SourcesResponse>;
}
