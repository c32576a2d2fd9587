//! Chat model abstraction over the completions endpoint.

use crate::config::LlmSettings;
use crate::error::{HeraldError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// One assistant turn returned by the model.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ChatCompletionMessageToolCall>,
}

impl ModelReply {
    /// Text reply with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }
}

/// Trait for chat completion backends.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the conversation and return the next assistant turn.
    ///
    /// An empty `tools` slice disables tool calling for the request.
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatCompletionRequestMessage],
        tools: &[ChatCompletionTool],
    ) -> Result<ModelReply>;
}

/// Single system + user exchange without tools. Returns the reply text.
pub async fn complete_once(
    model: &dyn ChatModel,
    model_name: &str,
    system_prompt: &str,
    user_message: &str,
) -> Result<String> {
    let messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt.to_string())
            .build()
            .map_err(|e| HeraldError::Agent(e.to_string()))?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(user_message.to_string())
            .build()
            .map_err(|e| HeraldError::Agent(e.to_string()))?
            .into(),
    ];

    let reply = model.complete(model_name, &messages, &[]).await?;
    Ok(reply.content.unwrap_or_default())
}

/// Chat model backed by an OpenAI-compatible API.
pub struct OpenAIChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
}

impl OpenAIChatModel {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip(self, messages, tools), fields(messages = messages.len(), tools = tools.len()))]
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatCompletionRequestMessage],
        tools: &[ChatCompletionTool],
    ) -> Result<ModelReply> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model).messages(messages.to_vec());
        if !tools.is_empty() {
            args.tools(tools.to_vec());
        }
        let request = args.build().map_err(|e| HeraldError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| HeraldError::OpenAI(format!("Chat API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| HeraldError::Agent("No response from model".to_string()))?;

        let reply = ModelReply {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
        };
        debug!(
            "Model replied with {} tool call(s)",
            reply.tool_calls.len()
        );
        Ok(reply)
    }
}
