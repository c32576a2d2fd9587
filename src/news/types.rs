//! Response records returned by NewsAPI.
//!
//! Field names mirror the wire format so a decoded response re-serializes
//! to the same JSON shape the API sent.

use serde::{Deserialize, Serialize};

/// Response body of `/top-headlines` and `/everything`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticlesResponse {
    pub status: String,
    #[serde(rename = "totalResults", default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// A single article record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub source: ArticleSource,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "urlToImage")]
    pub url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub content: Option<String>,
}

/// Publisher reference embedded in an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Response body of `/top-headlines/sources`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub status: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// A news source (publisher or blog).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}

/// Error envelope (`{"status": "error", "code": ..., "message": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub status: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_articles_with_missing_fields() {
        let body = r#"{
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": {"id": null, "name": "Example Times"},
                "author": null,
                "title": "Markets rally",
                "description": null,
                "url": "https://example.com/markets",
                "urlToImage": null,
                "publishedAt": "2025-06-24T08:00:00Z",
                "content": null
            }]
        }"#;

        let response: ArticlesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.total_results, 1);
        let article = &response.articles[0];
        assert_eq!(article.source.name.as_deref(), Some("Example Times"));
        assert!(article.source.id.is_none());
        assert_eq!(article.published_at.as_deref(), Some("2025-06-24T08:00:00Z"));

        let reencoded = serde_json::to_value(&response).unwrap();
        assert_eq!(reencoded["articles"][0]["urlToImage"], serde_json::Value::Null);
        assert_eq!(reencoded["totalResults"], 1);
    }
}
