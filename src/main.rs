//! Herald CLI entry point.

use anyhow::Result;
use clap::Parser;
use herald::cli::{commands, Cli, Commands, TimeAction};
use herald::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(std::path::PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("herald={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings, config_path.as_ref())?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, config_path.as_ref())?;
        }

        Commands::Ask { query, context } => {
            commands::run_ask(query, context.as_deref(), cli.json, settings).await?;
        }

        Commands::Chat { history } => {
            commands::run_chat(*history, settings).await?;
        }

        Commands::Headlines(args) => {
            commands::run_headlines(args, cli.json, settings).await?;
        }

        Commands::Everything(args) => {
            commands::run_everything(args, cli.json, settings).await?;
        }

        Commands::Sources(args) => {
            commands::run_sources(args, cli.json, settings).await?;
        }

        Commands::Time { action } => match action {
            TimeAction::Today => commands::run_time_today(&settings)?,
            TimeAction::Year => commands::run_time_year(&settings)?,
            TimeAction::Parse { text } => commands::run_time_parse(&text.join(" "), &settings)?,
        },

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path.as_ref())?;
        }
    }

    Ok(())
}
