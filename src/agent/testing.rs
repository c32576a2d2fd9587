//! In-memory chat model and news API doubles for tests.

use super::model::{ChatModel, ModelReply};
use crate::error::{HeraldError, Result};
use crate::news::{
    ArticlesResponse, EverythingParams, NewsApi, QueryPairs, QueryParams, SourcesParams,
    SourcesResponse, TopHeadlinesParams,
};
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestMessage, ChatCompletionTool,
    ChatCompletionToolType, FunctionCall,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Build a tool call as the model would send it.
pub fn tool_call(id: &str, name: &str, arguments: &str) -> ChatCompletionMessageToolCall {
    ChatCompletionMessageToolCall {
        id: id.to_string(),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall {
            name: name.to_string(),
            arguments: arguments.to_string(),
        },
    }
}

/// A request as seen by [`ScriptedModel`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionRequestMessage>,
    pub tool_count: usize,
}

impl RecordedRequest {
    /// The conversation serialized as JSON, for substring assertions.
    pub fn transcript(&self) -> String {
        serde_json::to_string(&self.messages).unwrap_or_default()
    }
}

/// Chat model that replays a fixed script of replies.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ModelReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<ModelReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatCompletionRequestMessage],
        tools: &[ChatCompletionTool],
    ) -> Result<ModelReply> {
        self.requests.lock().unwrap().push(RecordedRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            tool_count: tools.len(),
        });

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| HeraldError::Agent("script exhausted".to_string()))
    }
}

/// News API stub that records forwarded query pairs.
#[derive(Default)]
pub struct RecordingNews {
    calls: Mutex<Vec<(&'static str, QueryPairs)>>,
    failure: Option<(String, String)>,
}

impl RecordingNews {
    pub fn failing(code: &str, message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some((code.to_string(), message.to_string())),
        }
    }

    pub fn calls(&self) -> Vec<(&'static str, QueryPairs)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, endpoint: &'static str, pairs: QueryPairs) -> Result<()> {
        self.calls.lock().unwrap().push((endpoint, pairs));
        match &self.failure {
            Some((code, message)) => Err(HeraldError::NewsApi {
                code: code.clone(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn articles() -> ArticlesResponse {
        serde_json::from_str(
            r#"{"status": "ok", "totalResults": 1, "articles": [{
                "source": {"id": "bbc-news", "name": "BBC News"},
                "author": null, "title": "Test headline", "description": "Test description",
                "url": "https://example.com/a", "urlToImage": null,
                "publishedAt": "2025-06-24T08:00:00Z", "content": null}]}"#,
        )
        .unwrap()
    }
}

#[async_trait]
impl NewsApi for RecordingNews {
    async fn top_headlines(&self, params: &TopHeadlinesParams) -> Result<ArticlesResponse> {
        self.record("top-headlines", params.query_pairs())?;
        Ok(Self::articles())
    }

    async fn everything(&self, params: &EverythingParams) -> Result<ArticlesResponse> {
        self.record("everything", params.query_pairs())?;
        Ok(Self::articles())
    }

    async fn sources(&self, params: &SourcesParams) -> Result<SourcesResponse> {
        self.record("sources", params.query_pairs())?;
        Ok(SourcesResponse {
            status: "ok".to_string(),
            sources: Vec::new(),
        })
    }
}
