//! Interactive chat command.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::orchestrator::{Orchestrator, Reply};
use console::style;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(history: usize, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'herald doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let mut chat = ChatSession::new(orchestrator, history);

    println!("\n{}", style("Herald Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask about the news, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            chat.clear_history();
            Output::info("Conversation history cleared.");
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let result = chat.send_message(input).await;
        spinner.finish_and_clear();

        match result {
            Ok(reply) => {
                if !reply.tool_calls.is_empty() {
                    Output::tool_calls(&reply.tool_calls);
                }
                println!("\n{} {}\n", style("Herald:").cyan().bold(), reply.content);
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}

/// Chat session that passes recent exchanges along as context.
struct ChatSession {
    orchestrator: Orchestrator,
    exchanges: VecDeque<(String, String)>,
    max_exchanges: usize,
}

impl ChatSession {
    fn new(orchestrator: Orchestrator, max_exchanges: usize) -> Self {
        Self {
            orchestrator,
            exchanges: VecDeque::new(),
            max_exchanges,
        }
    }

    fn clear_history(&mut self) {
        self.exchanges.clear();
    }

    async fn send_message(&mut self, user_input: &str) -> Result<Reply> {
        let context = format_context(&self.exchanges);
        let context = (!context.is_empty()).then_some(context);

        let reply = self
            .orchestrator
            .respond(user_input, context.as_deref())
            .await?;

        remember(
            &mut self.exchanges,
            self.max_exchanges,
            user_input,
            &reply.content,
        );
        Ok(reply)
    }
}

/// Push an exchange, dropping the oldest beyond `max`.
fn remember(exchanges: &mut VecDeque<(String, String)>, max: usize, user: &str, assistant: &str) {
    if max == 0 {
        return;
    }
    exchanges.push_back((user.to_string(), assistant.to_string()));
    while exchanges.len() > max {
        exchanges.pop_front();
    }
}

fn format_context(exchanges: &VecDeque<(String, String)>) -> String {
    exchanges
        .iter()
        .map(|(user, assistant)| format!("User: {}\nAssistant: {}", user, assistant))
        .collect::<Vec<_>>()
        .join("\n")
}
