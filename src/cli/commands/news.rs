//! Direct NewsAPI commands (no LLM).

use crate::cli::preflight::{self, Operation};
use crate::cli::{EverythingArgs, HeadlinesArgs, Output, SourcesArgs};
use crate::config::Settings;
use crate::news::{
    ArticlesResponse, EverythingParams, NewsApi, NewsApiClient, SourcesParams, TopHeadlinesParams,
};
use anyhow::Result;

/// Run the headlines command.
pub async fn run_headlines(args: &HeadlinesArgs, json: bool, settings: Settings) -> Result<()> {
    let client = client(&settings)?;
    let params = TopHeadlinesParams::from(args).with_default_page_size(settings.news.default_page_size);

    let spinner = Output::spinner("Fetching top headlines...");
    let result = client.top_headlines(&params).await;
    spinner.finish_and_clear();

    print_articles(result?, json)
}

/// Run the everything command.
pub async fn run_everything(args: &EverythingArgs, json: bool, settings: Settings) -> Result<()> {
    let client = client(&settings)?;
    let params = EverythingParams::from(args);

    let spinner = Output::spinner("Searching articles...");
    let result = client.everything(&params).await;
    spinner.finish_and_clear();

    print_articles(result?, json)
}

/// Run the sources command.
pub async fn run_sources(args: &SourcesArgs, json: bool, settings: Settings) -> Result<()> {
    let client = client(&settings)?;
    let params = SourcesParams::from(args);

    let spinner = Output::spinner("Fetching sources...");
    let result = client.sources(&params).await;
    spinner.finish_and_clear();

    let response = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.sources.is_empty() {
        Output::info("No sources found.");
        return Ok(());
    }

    Output::header(&format!("Sources ({})", response.sources.len()));
    for source in &response.sources {
        Output::source(source);
    }
    println!();

    Ok(())
}

fn client(settings: &Settings) -> Result<NewsApiClient> {
    if let Err(e) = preflight::check(Operation::News, settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'herald doctor' for detailed diagnostics.");
        return Err(e.into());
    }
    Ok(NewsApiClient::from_settings(&settings.news)?)
}

fn print_articles(response: ArticlesResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.articles.is_empty() {
        Output::info("No articles found.");
        return Ok(());
    }

    Output::header(&format!(
        "Articles ({} of {})",
        response.articles.len(),
        response.total_results
    ));
    for article in &response.articles {
        Output::article(article);
    }
    println!();

    Ok(())
}
