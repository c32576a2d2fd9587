//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};
use std::path::PathBuf;

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings, config_path: Option<&PathBuf>) -> anyhow::Result<()> {
    Output::header("Herald Setup");
    println!();
    println!("Welcome to Herald! Let's make sure everything is configured correctly.\n");

    // Step 1: Chat model key
    println!("{}", style("Step 1: Checking chat model access").bold().cyan());
    println!();

    let chat_var = &settings.llm.api_key_env;
    if std::env::var(chat_var).map(|k| k.is_empty()).unwrap_or(true) {
        Output::warning(&format!("{} environment variable is not set.", chat_var));
        println!();
        println!("  Herald uses a chat model to route questions and call news tools.");
        println!(
            "  Get an OpenAI key from: {}",
            style("https://platform.openai.com/api-keys").underlined()
        );
        println!("  (any OpenAI-compatible endpoint works via llm.api_base)");
        println!();
        println!("  {}", style(format!("export {}='sk-...'", chat_var)).green());
        println!();

        if !prompt_continue("Continue without a chat API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'herald init' again.");
            return Ok(());
        }
    } else {
        Output::success("Chat API key is configured!");
    }

    println!();

    // Step 2: NewsAPI key
    println!("{}", style("Step 2: Checking NewsAPI access").bold().cyan());
    println!();

    if settings.news.resolve_api_key().is_none() {
        Output::warning("No NewsAPI key found.");
        println!();
        println!(
            "  Register for a free key at: {}",
            style("https://newsapi.org/register").underlined()
        );
        println!();
        println!(
            "  {}",
            style(format!("export {}='...'", settings.news.api_key_env)).green()
        );
        println!("  (or set news.api_key in the config file)");
        println!();

        if !prompt_continue("Continue without a NewsAPI key?")? {
            println!();
            Output::info("Setup cancelled. Set your NewsAPI key and run 'herald init' again.");
            return Ok(());
        }
    } else {
        Output::success("NewsAPI key is configured!");
    }

    println!();

    // Step 3: Config file
    println!("{}", style("Step 3: Configuration file").bold().cyan());
    println!();

    let config_path = config_path
        .cloned()
        .unwrap_or_else(Settings::default_config_path);
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("herald config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("herald doctor").cyan());
    println!("  {} Browse today's headlines", style("herald headlines --country us").cyan());
    println!(
        "  {} Ask in plain language",
        style("herald ask \"tech news from last week\"").cyan()
    );
    println!();
    println!("For more help: {}", style("herald --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }
}
