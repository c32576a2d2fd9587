//! CLI output formatting utilities.

use crate::agent::ToolCallRecord;
use crate::news::{Article, Source};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one article.
    pub fn article(article: &Article) {
        let title = article.title.as_deref().unwrap_or("(untitled)");
        let source = article.source.name.as_deref().unwrap_or("unknown source");

        println!(
            "\n{} {} ({})",
            style(">>").green(),
            style(title).bold(),
            style(source).cyan()
        );
        if let Some(published) = &article.published_at {
            println!("   {}", style(published).dim());
        }
        if let Some(description) = &article.description {
            println!("   {}", content_preview(description, 200));
        }
        if let Some(url) = &article.url {
            println!("   {}", style(url).dim());
        }
    }

    /// Print one news source.
    pub fn source(source: &Source) {
        let name = source.name.as_deref().unwrap_or("(unnamed)");
        let id = source.id.as_deref().unwrap_or("-");
        let tags: Vec<&str> = [&source.category, &source.language, &source.country]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect();

        println!(
            "  {} {} ({}) {}",
            style("*").cyan(),
            style(name).bold(),
            style(id).dim(),
            style(tags.join(", ")).dim()
        );
    }

    /// Print the tools the agent called.
    pub fn tool_calls(calls: &[ToolCallRecord]) {
        for call in calls {
            let icon = if call.failed {
                style("✗").red()
            } else {
                style("✓").green()
            };
            println!("  {} {}", icon, style(call).dim());
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Collapse newlines and truncate with an ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
