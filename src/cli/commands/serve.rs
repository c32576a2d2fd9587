//! HTTP API server for integration with other systems.
//!
//! Exposes routed questions and direct tool calls as JSON endpoints.

use crate::agent::tool_definitions;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::HeraldError;
use crate::orchestrator::Orchestrator;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'herald doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/tools/{name}", post(run_tool))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Herald API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask", "POST /ask");
    Output::kv("Run tool", "POST /tools/{name}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    query: String,
    #[serde(default)]
    context: Option<String>,
}

#[derive(Serialize)]
struct ToolResponse {
    tool: String,
    output: serde_json::Value,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ask(State(state): State<Arc<AppState>>, Json(req): Json<AskRequest>) -> impl IntoResponse {
    match state
        .orchestrator
        .respond(&req.query, req.context.as_deref())
        .await
    {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            warn!("Ask failed: {}", e);
            error_response(status_for(&e), &e)
        }
    }
}

async fn run_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: String,
) -> impl IntoResponse {
    if !is_known_tool(&name) {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown tool: {}", name),
            }),
        )
            .into_response();
    }

    match state.orchestrator.run_tool(&name, &body).await {
        Ok(output) => Json(ToolResponse {
            tool: name,
            output: output_value(output),
        })
        .into_response(),
        Err(e) => error_response(status_for(&e), &e),
    }
}

fn is_known_tool(name: &str) -> bool {
    tool_definitions().iter().any(|t| t.function.name == name)
}

/// News tools return JSON documents and the year is a number. Dates stay strings.
fn output_value(output: String) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(&output) {
        Ok(value) if value.is_object() || value.is_array() || value.is_number() => value,
        _ => serde_json::Value::String(output),
    }
}

fn status_for(error: &HeraldError) -> StatusCode {
    match error {
        HeraldError::NewsApi { .. } | HeraldError::Http(_) | HeraldError::OpenAI(_) => {
            StatusCode::BAD_GATEWAY
        }
        HeraldError::DateParse(_) => StatusCode::UNPROCESSABLE_ENTITY,
        HeraldError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        HeraldError::Agent(msg)
            if msg.starts_with("Invalid tool arguments") || msg.starts_with("Missing") =>
        {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, error: &HeraldError) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tools() {
        assert!(is_known_tool("get_top_headlines"));
        assert!(is_known_tool("parse_to_ist"));
        assert!(!is_known_tool("get_weather"));
    }

    #[test]
    fn test_output_value() {
        assert_eq!(
            output_value(r#"{"status":"ok"}"#.to_string()),
            serde_json::json!({"status": "ok"})
        );
        assert_eq!(output_value("2025".to_string()), serde_json::json!(2025));
        assert_eq!(
            output_value("2025-06-24T17:00:00+05:30".to_string()),
            serde_json::json!("2025-06-24T17:00:00+05:30")
        );
    }

    #[test]
    fn test_status_for_errors() {
        let news = HeraldError::NewsApi {
            code: "rateLimited".to_string(),
            message: "Too many requests".to_string(),
        };
        assert_eq!(status_for(&news), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(&HeraldError::DateParse("soon-ish".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&HeraldError::Agent("Invalid tool arguments: eof".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&HeraldError::Agent("Agent exceeded maximum iterations (8)".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
