//! HTTP client for NewsAPI v2.

use super::params::{EverythingParams, QueryPairs, QueryParams, SourcesParams, TopHeadlinesParams};
use super::types::{ApiErrorBody, ArticlesResponse, SourcesResponse};
use super::NewsApi;
use crate::config::NewsSettings;
use crate::error::{HeraldError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// NewsAPI client authenticated with a single static key.
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    /// Create a client for the given base URL (e.g. `https://newsapi.org/v2`).
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| HeraldError::Config(format!("Invalid NewsAPI base URL '{}': {}", base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a client from settings, resolving the key from env or config.
    pub fn from_settings(settings: &NewsSettings) -> Result<Self> {
        let api_key = settings.resolve_api_key().ok_or_else(|| {
            HeraldError::Config(format!(
                "NewsAPI key not set. Set it with: export {}='...' (or news.api_key in the config file)",
                settings.api_key_env
            ))
        })?;

        Self::new(
            api_key,
            &settings.base_url,
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, pairs: QueryPairs) -> Result<T> {
        let url = self.endpoint(path);
        debug!("GET {} with {} parameter(s)", url, pairs.len());

        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&pairs)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if let Ok(error) = serde_json::from_str::<ApiErrorBody>(&body) {
            if error.status == "error" {
                return Err(HeraldError::NewsApi {
                    code: error.code.unwrap_or_else(|| status.as_str().to_string()),
                    message: error.message.unwrap_or_default(),
                });
            }
        }

        if !status.is_success() {
            return Err(HeraldError::NewsApi {
                code: status.as_str().to_string(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl NewsApi for NewsApiClient {
    #[instrument(skip(self))]
    async fn top_headlines(&self, params: &TopHeadlinesParams) -> Result<ArticlesResponse> {
        self.get("top-headlines", params.query_pairs()).await
    }

    #[instrument(skip(self))]
    async fn everything(&self, params: &EverythingParams) -> Result<ArticlesResponse> {
        self.get("everything", params.query_pairs()).await
    }

    #[instrument(skip(self))]
    async fn sources(&self, params: &SourcesParams) -> Result<SourcesResponse> {
        self.get("top-headlines/sources", params.query_pairs()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const ARTICLES_BODY: &str = r#"{
        "status": "ok",
        "totalResults": 1,
        "articles": [{
            "source": {"id": "bbc-news", "name": "BBC News"},
            "author": "BBC",
            "title": "Headline",
            "description": "Something happened",
            "url": "https://bbc.co.uk/news/1",
            "urlToImage": null,
            "publishedAt": "2025-06-24T08:00:00Z",
            "content": null
        }]
    }"#;

    fn client(server: &mockito::ServerGuard) -> NewsApiClient {
        NewsApiClient::new("test-key", &server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_top_headlines_forwards_only_present_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/top-headlines")
            .match_header("x-api-key", "test-key")
            .match_query(Matcher::Exact("country=us&pageSize=5".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ARTICLES_BODY)
            .create_async()
            .await;

        let params = TopHeadlinesParams {
            q: Some(String::new()),
            country: Some("us".to_string()),
            ..Default::default()
        }
        .with_default_page_size(5);

        let response = client(&server).top_headlines(&params).await.unwrap();
        assert_eq!(response.articles.len(), 1);
        assert_eq!(response.articles[0].source.id.as_deref(), Some("bbc-news"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_everything_passes_unvalidated_values_through() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/everything")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".to_string(), "crypto AND (ethereum OR litecoin)".to_string()),
                Matcher::UrlEncoded("sortBy".to_string(), "whatever".to_string()),
                Matcher::UrlEncoded("from".to_string(), "not-a-date".to_string()),
            ]))
            .with_status(200)
            .with_body(ARTICLES_BODY)
            .create_async()
            .await;

        let params = EverythingParams {
            q: Some("crypto AND (ethereum OR litecoin)".to_string()),
            sort_by: Some("whatever".to_string()),
            from: Some("not-a-date".to_string()),
            ..Default::default()
        };

        client(&server).everything(&params).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sources_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/top-headlines/sources")
            .match_query(Matcher::Exact("category=science&language=en".to_string()))
            .with_status(200)
            .with_body(
                r#"{"status": "ok", "sources": [{"id": "new-scientist", "name": "New Scientist",
                    "description": "Science news", "url": "https://www.newscientist.com",
                    "category": "science", "language": "en", "country": "us"}]}"#,
            )
            .create_async()
            .await;

        let params = SourcesParams {
            category: Some("science".to_string()),
            language: Some("en".to_string()),
            country: None,
        };

        let response = client(&server).sources(&params).await.unwrap();
        assert_eq!(response.sources[0].id.as_deref(), Some("new-scientist"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_propagates_code_and_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/top-headlines")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#)
            .create_async()
            .await;

        let err = client(&server)
            .top_headlines(&TopHeadlinesParams::default())
            .await
            .unwrap_err();

        match err {
            HeraldError::NewsApi { code, message } => {
                assert_eq!(code, "apiKeyInvalid");
                assert_eq!(message, "Your API key is invalid.");
            }
            other => panic!("Expected NewsApi error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_failure_uses_http_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/everything")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = client(&server)
            .everything(&EverythingParams::default())
            .await
            .unwrap_err();

        match err {
            HeraldError::NewsApi { code, message } => {
                assert_eq!(code, "502");
                assert_eq!(message, "bad gateway");
            }
            other => panic!("Expected NewsApi error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let result = NewsApiClient::new("key", "not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(HeraldError::Config(_))));
    }

    #[test]
    fn test_from_settings_requires_key() {
        let settings = NewsSettings {
            api_key: None,
            api_key_env: "HERALD_TEST_UNSET_NEWS_KEY".to_string(),
            ..NewsSettings::default()
        };
        assert!(matches!(
            NewsApiClient::from_settings(&settings),
            Err(HeraldError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client =
            NewsApiClient::new("key", "https://newsapi.org/v2/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint("everything"), "https://newsapi.org/v2/everything");
    }
}
