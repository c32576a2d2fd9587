//! Agent system for routing queries and answering them with news tools.
//!
//! A router model decides between a greeting responder and the news
//! pipeline. The pipeline restates the query as an explicit intent, then
//! runs a tool-calling agent against NewsAPI and the date helpers.

mod model;
mod pipeline;
mod router;
mod runner;
mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use model::{complete_once, ChatModel, ModelReply, OpenAIChatModel};
pub use pipeline::{Greeter, IntentElaborator, NewsPipeline, PipelineOutcome};
pub use router::{Route, Router};
pub use runner::{Agent, AgentResponse, ToolCallRecord};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext, DEFAULT_HEADLINES_PAGE_SIZE};
