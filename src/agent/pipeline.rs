//! The greeting responder and the two-step news pipeline.

use super::model::{complete_once, ChatModel};
use super::runner::{Agent, AgentResponse};
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Answers greetings without tools.
pub struct Greeter {
    model: Arc<dyn ChatModel>,
    model_name: String,
    system_prompt: String,
}

impl Greeter {
    pub fn new(model: Arc<dyn ChatModel>, model_name: &str, system_prompt: &str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            system_prompt: system_prompt.to_string(),
        }
    }

    pub async fn respond(&self, query: &str, context: Option<&str>) -> Result<String> {
        let message = with_context(query, context);
        complete_once(
            self.model.as_ref(),
            &self.model_name,
            &self.system_prompt,
            &message,
        )
        .await
    }
}

/// Restates a query as structured prose describing the user's intent.
pub struct IntentElaborator {
    model: Arc<dyn ChatModel>,
    model_name: String,
    system_prompt: String,
}

impl IntentElaborator {
    pub fn new(model: Arc<dyn ChatModel>, model_name: &str, system_prompt: &str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            system_prompt: system_prompt.to_string(),
        }
    }

    pub async fn elaborate(&self, query: &str, context: Option<&str>) -> Result<String> {
        let message = with_context(query, context);
        let intent = complete_once(
            self.model.as_ref(),
            &self.model_name,
            &self.system_prompt,
            &message,
        )
        .await?;
        Ok(intent.trim().to_string())
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Elaborated intent handed to the news agent.
    pub intent: String,
    pub response: AgentResponse,
}

/// Intent elaboration followed by the tool-calling news agent.
pub struct NewsPipeline {
    elaborator: IntentElaborator,
    agent: Agent,
}

impl NewsPipeline {
    pub fn new(elaborator: IntentElaborator, agent: Agent) -> Self {
        Self { elaborator, agent }
    }

    pub async fn run(&self, query: &str, context: Option<&str>) -> Result<PipelineOutcome> {
        let intent = self.elaborator.elaborate(query, context).await?;
        debug!("Elaborated intent: {}", intent);

        // An empty elaboration still leaves the agent something to act on.
        let task = if intent.is_empty() {
            format!("The user asked: {}", query)
        } else {
            format!("User query: {}\n\nElaborated intent:\n{}", query, intent)
        };

        let response = self.agent.run(&task, None).await?;
        info!(
            "News pipeline finished after {} iteration(s), {} tool call(s)",
            response.iterations,
            response.tool_calls.len()
        );

        Ok(PipelineOutcome { intent, response })
    }
}

fn with_context(query: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.trim().is_empty() => {
            format!("Previous conversation:\n{}\n\nCurrent message: {}", ctx, query)
        }
        _ => query.to_string(),
    }
}
