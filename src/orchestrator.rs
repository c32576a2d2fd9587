//! Query orchestrator for Herald.
//!
//! Routes each query to the greeting responder or the news pipeline and
//! wires the shared model, news client and clock into both.

use crate::agent::{
    parse_tool_call, Agent, ChatModel, Greeter, IntentElaborator, NewsPipeline, OpenAIChatModel,
    Route, Router, ToolCallRecord, ToolContext,
};
use crate::config::{Prompts, Settings};
use crate::error::{HeraldError, Result};
use crate::news::{NewsApi, NewsApiClient};
use crate::time::Clock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for Herald.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    model: Arc<dyn ChatModel>,
    news: Arc<dyn NewsApi>,
    clock: Arc<Clock>,
}

impl Orchestrator {
    /// Create an orchestrator from settings, using the OpenAI model and NewsAPI.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let model: Arc<dyn ChatModel> = Arc::new(OpenAIChatModel::new(&settings.llm)?);
        let news: Arc<dyn NewsApi> = Arc::new(NewsApiClient::from_settings(&settings.news)?);
        let clock = Arc::new(Clock::from_settings(&settings.time)?);

        info!(
            "Using model {} (router: {}), timezone {}",
            settings.llm.model,
            settings.llm.router_model(),
            clock.label()
        );

        Ok(Self::with_components(settings, prompts, model, news, clock))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        model: Arc<dyn ChatModel>,
        news: Arc<dyn NewsApi>,
        clock: Arc<Clock>,
    ) -> Self {
        Self {
            settings,
            prompts,
            model,
            news,
            clock,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> Arc<Clock> {
        self.clock.clone()
    }

    /// Tool context for running tools directly, outside the agent loop.
    pub fn tool_context(&self) -> ToolContext {
        ToolContext::new(self.news.clone(), self.clock.clone())
            .with_default_page_size(self.settings.news.default_page_size)
    }

    /// Run one tool by wire name with JSON arguments.
    pub async fn run_tool(&self, name: &str, arguments: &str) -> Result<String> {
        let tool = parse_tool_call(name, arguments)?;
        self.tool_context().execute(&tool).await
    }

    /// Route a query and answer it.
    #[instrument(skip(self, context))]
    pub async fn respond(&self, query: &str, context: Option<&str>) -> Result<Reply> {
        if query.trim().is_empty() {
            return Err(HeraldError::InvalidInput("Query is empty".to_string()));
        }

        let router = Router::new(
            self.model.clone(),
            self.settings.llm.router_model(),
            &self.render(&self.prompts.router.system),
        );
        let route = router.route(query).await?;
        info!("Routed query to {}", route);

        match route {
            Route::Greeting => {
                let greeter = Greeter::new(
                    self.model.clone(),
                    &self.settings.llm.model,
                    &self.render(&self.prompts.greeting.system),
                );
                let content = greeter.respond(query, context).await?;

                Ok(Reply {
                    route,
                    content,
                    intent: None,
                    tool_calls: Vec::new(),
                    iterations: 0,
                })
            }
            Route::News => {
                let outcome = self.pipeline().run(query, context).await?;

                Ok(Reply {
                    route,
                    content: outcome.response.content,
                    intent: Some(outcome.intent),
                    tool_calls: outcome.response.tool_calls,
                    iterations: outcome.response.iterations,
                })
            }
        }
    }

    fn pipeline(&self) -> NewsPipeline {
        let elaborator = IntentElaborator::new(
            self.model.clone(),
            &self.settings.llm.model,
            &self.render(&self.prompts.intent.system),
        );
        let agent = Agent::new(self.model.clone(), &self.settings.llm.model, self.tool_context())
            .with_system_prompt(&self.render(&self.prompts.api.system))
            .with_max_iterations(self.settings.llm.max_iterations);

        NewsPipeline::new(elaborator, agent)
    }

    /// Render a prompt with the date built-ins, evaluated per request.
    fn render(&self, template: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("today".to_string(), self.clock.current_date());
        vars.insert("year".to_string(), self.clock.current_year().to_string());
        vars.insert("timezone".to_string(), self.clock.label().to_string());
        self.prompts.render_with_custom(template, &vars)
    }
}

/// Answer to one query.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    /// Path that handled the query.
    pub route: Route,
    /// Final text shown to the user.
    pub content: String,
    /// Elaborated intent, for news queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Tools called by the news agent.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Model turns used by the news agent.
    pub iterations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::{tool_call, RecordingNews, ScriptedModel};
    use crate::agent::ModelReply;

    fn orchestrator(model: Arc<ScriptedModel>, news: Arc<RecordingNews>) -> Orchestrator {
        let mut settings = Settings::default();
        settings.llm.model = "main-model".to_string();
        settings.llm.router_model = Some("router-model".to_string());
        settings.news.default_page_size = 3;

        Orchestrator::with_components(
            settings,
            Prompts::default(),
            model,
            news,
            Arc::new(Clock::ist()),
        )
    }

    #[tokio::test]
    async fn test_greeting_skips_pipeline() {
        let model = Arc::new(ScriptedModel::new(vec![
            ModelReply::text("greeting"),
            ModelReply::text("Hello! What's your name?"),
        ]));
        let news = Arc::new(RecordingNews::default());

        let reply = orchestrator(model.clone(), news.clone())
            .respond("hello", None)
            .await
            .unwrap();

        assert_eq!(reply.route, Route::Greeting);
        assert_eq!(reply.content, "Hello! What's your name?");
        assert!(reply.intent.is_none());
        assert!(news.calls().is_empty());

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].model, "router-model");
        assert_eq!(requests[1].model, "main-model");
        assert_eq!(requests[1].tool_count, 0);
    }

    #[tokio::test]
    async fn test_news_query_runs_pipeline() {
        let model = Arc::new(ScriptedModel::new(vec![
            ModelReply::text("news"),
            ModelReply::text("The user wants current top headlines from India."),
            ModelReply {
                content: None,
                tool_calls: vec![tool_call("call_1", "get_top_headlines", r#"{"country": "in"}"#)],
            },
            ModelReply::text("- Test headline (BBC News)"),
        ]));
        let news = Arc::new(RecordingNews::default());

        let reply = orchestrator(model.clone(), news.clone())
            .respond("Show me the latest headlines in India", None)
            .await
            .unwrap();

        assert_eq!(reply.route, Route::News);
        assert_eq!(
            reply.intent.as_deref(),
            Some("The user wants current top headlines from India.")
        );
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.iterations, 2);
        assert_eq!(
            news.calls()[0].1,
            vec![
                ("country", "in".to_string()),
                ("pageSize", "3".to_string())
            ]
        );
        assert_eq!(model.remaining(), 0);
    }

    #[tokio::test]
    async fn test_prompts_render_date_variables() {
        let model = Arc::new(ScriptedModel::new(vec![
            ModelReply::text("news"),
            ModelReply::text("intent"),
            ModelReply::text("done"),
        ]));
        let orchestrator = orchestrator(model.clone(), Arc::new(RecordingNews::default()));
        orchestrator.respond("anything new?", None).await.unwrap();

        let today = orchestrator.clock().current_date();
        let transcript = model.requests()[1].transcript();
        assert!(transcript.contains(&today));
        assert!(!transcript.contains("{{today}}"));
    }

    #[tokio::test]
    async fn test_news_api_error_propagates_through_tool() {
        let news = Arc::new(RecordingNews::failing("apiKeyInvalid", "Your API key is invalid."));
        let orchestrator = orchestrator(Arc::new(ScriptedModel::new(Vec::new())), news);

        let err = orchestrator
            .run_tool("get_sources", r#"{"language": "en"}"#)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "NewsAPI error (apiKeyInvalid): Your API key is invalid."
        );
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let model = Arc::new(ScriptedModel::new(Vec::new()));
        let err = orchestrator(model.clone(), Arc::new(RecordingNews::default()))
            .respond("   ", None)
            .await
            .unwrap_err();

        assert!(matches!(err, HeraldError::InvalidInput(_)));
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_run_tool_current_year() {
        let orchestrator = orchestrator(
            Arc::new(ScriptedModel::new(Vec::new())),
            Arc::new(RecordingNews::default()),
        );
        let year = orchestrator.run_tool("get_current_year", "").await.unwrap();
        assert_eq!(year, orchestrator.clock().current_year().to_string());
    }
}
