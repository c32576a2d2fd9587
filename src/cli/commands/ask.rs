//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(query: &str, context: Option<&str>, json: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'herald doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Thinking...");
    let result = orchestrator.respond(query, context).await;
    spinner.finish_and_clear();

    match result {
        Ok(reply) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
                return Ok(());
            }

            println!("\n{}\n", reply.content);

            if !reply.tool_calls.is_empty() {
                Output::header("Tools used");
                Output::tool_calls(&reply.tool_calls);
                println!();
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
