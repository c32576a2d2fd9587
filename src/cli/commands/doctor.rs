//! Doctor command - verify API keys and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::PathBuf;
use url::Url;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: Option<&PathBuf>) -> anyhow::Result<()> {
    Output::header("Herald Doctor");
    println!();
    println!("Checking API keys and configuration...\n");

    let mut checks = Vec::new();

    let mut section = |title: &str, results: Vec<CheckResult>| {
        println!("{}", style(title).bold());
        for check in &results {
            check.print();
        }
        println!();
        checks.extend(results);
    };

    section(
        "API Keys",
        vec![
            check_chat_api_key(&settings.llm.api_key_env),
            check_news_api_key(settings),
        ],
    );

    section(
        "Endpoints",
        vec![
            check_chat_endpoint(settings.llm.api_base.as_deref()),
            check_url("NewsAPI base URL", &settings.news.base_url),
        ],
    );

    section(
        "Configuration",
        vec![
            check_config_file(config_path),
            check_timezone(settings),
            check_prompts_dir(settings.prompts.custom_dir.as_deref()),
        ],
    );

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Herald.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Herald is ready to use.");
    }

    Ok(())
}

/// Check the chat model key named by `llm.api_key_env`.
fn check_chat_api_key(var: &str) -> CheckResult {
    match std::env::var(var) {
        Ok(key) if key.is_empty() => CheckResult::error(
            var,
            "empty",
            &format!("Set with: export {}='sk-...'", var),
        ),
        Ok(key) => CheckResult::ok(var, &format!("configured ({})", mask_key(&key))),
        Err(_) => CheckResult::error(
            var,
            "not set",
            &format!("Set with: export {}='sk-...'", var),
        ),
    }
}

/// Check the NewsAPI key from the environment or config file.
fn check_news_api_key(settings: &Settings) -> CheckResult {
    let var = &settings.news.api_key_env;
    let from_env = std::env::var(var).map(|k| !k.is_empty()).unwrap_or(false);

    match settings.news.resolve_api_key() {
        Some(key) if from_env => {
            CheckResult::ok("NewsAPI key", &format!("from {} ({})", var, mask_key(&key)))
        }
        Some(key) => CheckResult::ok(
            "NewsAPI key",
            &format!("from config file ({})", mask_key(&key)),
        ),
        None => CheckResult::error(
            "NewsAPI key",
            "not set",
            &format!(
                "Get a key at https://newsapi.org/register, then: export {}='...'",
                var
            ),
        ),
    }
}

fn check_chat_endpoint(api_base: Option<&str>) -> CheckResult {
    match api_base.filter(|b| !b.is_empty()) {
        Some(base) => check_url("Chat API base", base),
        None => CheckResult::ok("Chat API base", "OpenAI default"),
    }
}

fn check_url(name: &str, value: &str) -> CheckResult {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "https" => CheckResult::ok(name, value),
        Ok(url) if url.scheme() == "http" => CheckResult::warning(
            name,
            value,
            "Plain HTTP sends API keys unencrypted",
        ),
        Ok(url) => CheckResult::error(
            name,
            &format!("unsupported scheme '{}'", url.scheme()),
            "Use an http(s) URL",
        ),
        Err(e) => CheckResult::error(name, &format!("invalid URL: {}", e), "Fix it in the config file"),
    }
}

fn check_timezone(settings: &Settings) -> CheckResult {
    match settings.time.offset() {
        Ok(offset) => CheckResult::ok(
            "Timezone",
            &format!("{} (UTC{})", settings.time.label, offset),
        ),
        Err(e) => CheckResult::error("Timezone", &e.to_string(), "Use the form +05:30"),
    }
}

fn check_prompts_dir(custom_dir: Option<&str>) -> CheckResult {
    match custom_dir {
        None => CheckResult::ok("Prompts", "built-in defaults"),
        Some(dir) => {
            let path = Settings::expand_path(dir);
            if path.is_dir() {
                CheckResult::ok("Prompts", &format!("custom ({})", path.display()))
            } else {
                CheckResult::warning(
                    "Prompts",
                    &format!("{} not found, using defaults", path.display()),
                    "Create the directory or remove prompts.custom_dir",
                )
            }
        }
    }
}

/// Check if config file exists.
fn check_config_file(config_path: Option<&PathBuf>) -> CheckResult {
    let config_path = config_path
        .cloned()
        .unwrap_or_else(Settings::default_config_path);
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: herald init (or herald config edit)",
        )
    }
}

/// Show the first and last four characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
