//! Tool definitions and implementations for the news agent.

use crate::error::{HeraldError, Result};
use crate::news::{EverythingParams, NewsApi, SourcesParams, TopHeadlinesParams};
use crate::time::Clock;
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Page size used for top headlines when the caller gives none.
pub const DEFAULT_HEADLINES_PAGE_SIZE: u32 = 5;

/// Available tools for the agent.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    /// Live top headlines.
    TopHeadlines(TopHeadlinesParams),
    /// Search all articles, optionally date-ranged.
    Everything(EverythingParams),
    /// List available news sources.
    Sources(SourcesParams),
    /// Current calendar year.
    CurrentYear,
    /// Free text to an ISO 8601 timestamp in the fixed zone.
    ParseToIst { text: String },
    /// Today's date in the fixed zone.
    CurrentDate,
}

impl ToolCall {
    /// Wire name of the tool.
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::TopHeadlines(_) => "get_top_headlines",
            ToolCall::Everything(_) => "get_everything",
            ToolCall::Sources(_) => "get_sources",
            ToolCall::CurrentYear => "get_current_year",
            ToolCall::ParseToIst { .. } => "parse_to_ist",
            ToolCall::CurrentDate => "get_current_date_ist",
        }
    }
}

/// Tool execution context with access to the news API and the clock.
#[derive(Clone)]
pub struct ToolContext {
    pub news: Arc<dyn NewsApi>,
    pub clock: Arc<Clock>,
    default_page_size: u32,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(news: Arc<dyn NewsApi>, clock: Arc<Clock>) -> Self {
        Self {
            news,
            clock,
            default_page_size: DEFAULT_HEADLINES_PAGE_SIZE,
        }
    }

    /// Override the page size applied to top headlines when omitted.
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        debug!("Executing tool {}", tool.name());
        match tool {
            ToolCall::TopHeadlines(params) => {
                let params = params.clone().with_default_page_size(self.default_page_size);
                let response = self.news.top_headlines(&params).await?;
                Ok(serde_json::to_string(&response)?)
            }
            ToolCall::Everything(params) => {
                let response = self.news.everything(params).await?;
                Ok(serde_json::to_string(&response)?)
            }
            ToolCall::Sources(params) => {
                let response = self.news.sources(params).await?;
                Ok(serde_json::to_string(&response)?)
            }
            ToolCall::CurrentYear => Ok(self.clock.current_year().to_string()),
            ToolCall::ParseToIst { text } => self.clock.parse(text),
            ToolCall::CurrentDate => Ok(self.clock.current_date()),
        }
    }
}

fn function(name: &str, description: &str, parameters: serde_json::Value) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: name.to_string(),
            description: Some(description.to_string()),
            parameters: Some(parameters),
            strict: None,
        },
    }
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<ChatCompletionTool> {
    let category = json!({
        "type": "string",
        "description": "One of: business, entertainment, general, health, science, sports, technology"
    });
    let language = json!({
        "type": "string",
        "description": "2-letter ISO 639-1 language code, e.g. en, de, fr"
    });
    let country = json!({
        "type": "string",
        "description": "2-letter ISO 3166-1 country code, e.g. us, in, gb"
    });
    let page_size = json!({
        "type": "integer",
        "description": "Number of results per page (max 100)"
    });
    let page = json!({
        "type": "integer",
        "description": "Page number for pagination"
    });

    vec![
        function(
            "get_top_headlines",
            "Fetch today's top and breaking headlines, filtered by keyword, sources, category, \
            language or country. Do not use for past dates or date ranges.",
            json!({
                "type": "object",
                "properties": {
                    "q": {"type": "string", "description": "Keywords or phrase to match"},
                    "sources": {
                        "type": "string",
                        "description": "Comma-separated source ids, e.g. bbc-news,the-verge. Cannot be combined with country or category."
                    },
                    "category": category.clone(),
                    "language": language.clone(),
                    "country": country.clone(),
                    "pageSize": {
                        "type": "integer",
                        "description": "Number of results (max 100, default 5)"
                    },
                    "page": page.clone()
                }
            }),
        ),
        function(
            "get_everything",
            "Search articles from the past five years across many sources and blogs. Use for \
            topic research, specific dates or ranges, specific publishers or domains.",
            json!({
                "type": "object",
                "properties": {
                    "q": {
                        "type": "string",
                        "description": "Keywords. Supports \"exact phrase\", +required, -excluded, AND/OR/NOT with grouping"
                    },
                    "searchIn": {
                        "type": "string",
                        "description": "Comma-separated fields to search: title, description, content"
                    },
                    "sources": {"type": "string", "description": "Comma-separated source ids (max 20)"},
                    "domains": {"type": "string", "description": "Comma-separated domains, e.g. bbc.co.uk,techcrunch.com"},
                    "excludeDomains": {"type": "string", "description": "Comma-separated domains to exclude"},
                    "from": {"type": "string", "description": "Oldest article date, ISO 8601"},
                    "to": {"type": "string", "description": "Newest article date, ISO 8601"},
                    "language": language.clone(),
                    "sortBy": {
                        "type": "string",
                        "description": "relevancy, popularity or publishedAt"
                    },
                    "pageSize": page_size,
                    "page": page
                }
            }),
        ),
        function(
            "get_sources",
            "List news sources (publishers, blogs) by category, language or country. Also use \
            this to look up source ids for the other tools.",
            json!({
                "type": "object",
                "properties": {
                    "category": category,
                    "language": language,
                    "country": country
                }
            }),
        ),
        function(
            "get_current_year",
            "Return the current year as an integer.",
            json!({"type": "object", "properties": {}}),
        ),
        function(
            "parse_to_ist",
            "Convert a natural-language date or time such as 'tomorrow 5 PM' or '3 days ago' \
            into an ISO 8601 timestamp in Indian Standard Time.",
            json!({
                "type": "object",
                "properties": {
                    "text": {"type": "string", "description": "The date or time expression"}
                },
                "required": ["text"]
            }),
        ),
        function(
            "get_current_date_ist",
            "Return today's date in Indian Standard Time as YYYY-MM-DD.",
            json!({"type": "object", "properties": {}}),
        ),
    ]
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let arguments = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };

    let invalid = |e: serde_json::Error| HeraldError::Agent(format!("Invalid tool arguments: {}", e));

    match name {
        "get_top_headlines" => Ok(ToolCall::TopHeadlines(
            serde_json::from_str(arguments).map_err(invalid)?,
        )),
        "get_everything" => Ok(ToolCall::Everything(
            serde_json::from_str(arguments).map_err(invalid)?,
        )),
        "get_sources" => Ok(ToolCall::Sources(
            serde_json::from_str(arguments).map_err(invalid)?,
        )),
        "get_current_year" => Ok(ToolCall::CurrentYear),
        "get_current_date_ist" => Ok(ToolCall::CurrentDate),
        "parse_to_ist" => {
            let args: serde_json::Value = serde_json::from_str(arguments).map_err(invalid)?;
            let text = args["text"]
                .as_str()
                .ok_or_else(|| HeraldError::Agent("Missing 'text' argument".to_string()))?
                .to_string();
            Ok(ToolCall::ParseToIst { text })
        }
        _ => Err(HeraldError::Agent(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::RecordingNews;
    use crate::news::QueryParams;

    fn context(news: Arc<RecordingNews>) -> ToolContext {
        ToolContext::new(news, Arc::new(Clock::ist()))
    }

    #[test]
    fn test_parse_top_headlines_tool() {
        let tool = parse_tool_call(
            "get_top_headlines",
            r#"{"country": "in", "category": "technology", "pageSize": 5}"#,
        )
        .unwrap();
        match tool {
            ToolCall::TopHeadlines(params) => {
                assert_eq!(params.country.as_deref(), Some("in"));
                assert_eq!(params.category.as_deref(), Some("technology"));
                assert_eq!(params.page_size, Some(5));
            }
            other => panic!("Expected TopHeadlines tool, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_tool_with_empty_arguments() {
        assert_eq!(
            parse_tool_call("get_current_year", "").unwrap(),
            ToolCall::CurrentYear
        );
        assert_eq!(
            parse_tool_call("get_sources", "").unwrap(),
            ToolCall::Sources(SourcesParams::default())
        );
    }

    #[test]
    fn test_parse_to_ist_requires_text() {
        let tool = parse_tool_call("parse_to_ist", r#"{"text": "tomorrow 5 PM"}"#).unwrap();
        assert_eq!(
            tool,
            ToolCall::ParseToIst {
                text: "tomorrow 5 PM".to_string()
            }
        );
        assert!(parse_tool_call("parse_to_ist", "{}").is_err());
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = parse_tool_call("delete_everything", "{}").unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[test]
    fn test_tool_definitions_cover_every_tool() {
        let names: Vec<String> = tool_definitions()
            .into_iter()
            .map(|t| t.function.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "get_top_headlines",
                "get_everything",
                "get_sources",
                "get_current_year",
                "parse_to_ist",
                "get_current_date_ist",
            ]
        );
        for name in &names {
            let args = if name == "parse_to_ist" { r#"{"text": "now"}"# } else { "{}" };
            assert_eq!(parse_tool_call(name, args).unwrap().name(), name.as_str());
        }
    }

    #[tokio::test]
    async fn test_top_headlines_applies_default_page_size() {
        let news = Arc::new(RecordingNews::default());
        let ctx = context(news.clone());

        let tool = parse_tool_call("get_top_headlines", r#"{"country": "us", "q": ""}"#).unwrap();
        let output = ctx.execute(&tool).await.unwrap();

        assert!(output.contains("\"articles\""));
        let calls = news.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "top-headlines");
        assert_eq!(
            calls[0].1,
            vec![("country", "us".to_string()), ("pageSize", "5".to_string())]
        );
    }

    #[tokio::test]
    async fn test_top_headlines_keeps_explicit_page_size() {
        let news = Arc::new(RecordingNews::default());
        let ctx = context(news.clone()).with_default_page_size(7);

        ctx.execute(&parse_tool_call("get_top_headlines", r#"{"pageSize": 12}"#).unwrap())
            .await
            .unwrap();
        ctx.execute(&parse_tool_call("get_top_headlines", "{}").unwrap())
            .await
            .unwrap();

        let calls = news.calls();
        assert_eq!(calls[0].1, vec![("pageSize", "12".to_string())]);
        assert_eq!(calls[1].1, vec![("pageSize", "7".to_string())]);
    }

    #[tokio::test]
    async fn test_everything_and_sources_forward_filtered_params() {
        let news = Arc::new(RecordingNews::default());
        let ctx = context(news.clone());

        let tool = parse_tool_call(
            "get_everything",
            r#"{"q": "Bitcoin", "domains": "techcrunch.com,engadget.com", "from_param": "2025-06-20", "sort_by": "relevancy", "to": null, "language": ""}"#,
        )
        .unwrap();
        if let ToolCall::Everything(params) = &tool {
            assert_eq!(params.query_pairs().len(), 4);
        }
        ctx.execute(&tool).await.unwrap();

        ctx.execute(&parse_tool_call("get_sources", r#"{"language": "en", "category": "science", "country": ""}"#).unwrap())
            .await
            .unwrap();

        let calls = news.calls();
        assert_eq!(calls[0].0, "everything");
        assert_eq!(
            calls[0].1,
            vec![
                ("q", "Bitcoin".to_string()),
                ("domains", "techcrunch.com,engadget.com".to_string()),
                ("from", "2025-06-20".to_string()),
                ("sortBy", "relevancy".to_string()),
            ]
        );
        assert_eq!(calls[1].0, "sources");
        assert_eq!(
            calls[1].1,
            vec![
                ("category", "science".to_string()),
                ("language", "en".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_news_errors_propagate() {
        let news = Arc::new(RecordingNews::failing("rateLimited", "Too many requests"));
        let ctx = context(news);

        let err = ctx
            .execute(&ToolCall::Everything(EverythingParams::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, HeraldError::NewsApi { ref code, .. } if code == "rateLimited"));
    }

    #[tokio::test]
    async fn test_time_tools() {
        let ctx = context(Arc::new(RecordingNews::default()));

        let year = ctx.execute(&ToolCall::CurrentYear).await.unwrap();
        assert_eq!(year, ctx.clock.current_year().to_string());

        let date = ctx.execute(&ToolCall::CurrentDate).await.unwrap();
        assert_eq!(date.len(), 10);

        let parsed = ctx
            .execute(&ToolCall::ParseToIst {
                text: "2025-06-26 17:00".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(parsed, "2025-06-26T17:00:00+05:30");

        let err = ctx
            .execute(&ToolCall::ParseToIst {
                text: "not a date at all".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HeraldError::DateParse(_)));
    }
}
