//! Routing between the greeting responder and the news pipeline.

use super::model::{complete_once, ChatModel};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Where a query is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Casual greeting, answered without tools.
    Greeting,
    /// Everything else: intent elaboration, then the news agent.
    News,
}

impl Route {
    /// Interpret the router model's answer. Anything that is not clearly a
    /// greeting goes to the news pipeline.
    pub fn from_label(label: &str) -> Self {
        let word = label
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphanumeric())
            .to_ascii_lowercase();

        match word.as_str() {
            "greeting" | "greeting_agent" | "greet" => Route::Greeting,
            _ => Route::News,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Greeting => write!(f, "greeting"),
            Route::News => write!(f, "news"),
        }
    }
}

/// LLM-backed query router.
pub struct Router {
    model: Arc<dyn ChatModel>,
    model_name: String,
    system_prompt: String,
}

impl Router {
    pub fn new(model: Arc<dyn ChatModel>, model_name: &str, system_prompt: &str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            system_prompt: system_prompt.to_string(),
        }
    }

    /// Ask the model which path should handle `query`.
    pub async fn route(&self, query: &str) -> Result<Route> {
        let label = complete_once(
            self.model.as_ref(),
            &self.model_name,
            &self.system_prompt,
            query,
        )
        .await?;
        let route = Route::from_label(&label);

        debug!("Router answered {:?} -> {}", label, route);
        Ok(route)
    }
}
