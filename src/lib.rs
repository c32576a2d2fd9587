//! Herald - an LLM-routed news assistant
//!
//! Herald answers natural-language questions about the news. A router model
//! sends each query either to a greeting responder or to a two-step news
//! pipeline: an intent elaborator restates the request, then a tool-calling
//! agent queries NewsAPI and resolves dates in a fixed timezone (IST by
//! default).
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `news` - NewsAPI parameters, responses and HTTP client
//! - `time` - Fixed-offset clock and natural-language date parsing
//! - `agent` - Router, greeter, intent elaborator and tool-calling agent
//! - `orchestrator` - Wires the pieces together per query
//!
//! # Example
//!
//! ```rust,no_run
//! use herald::config::Settings;
//! use herald::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let reply = orchestrator
//!         .respond("Top business headlines in the US", None)
//!         .await?;
//!     println!("{}", reply.content);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod news;
pub mod openai;
pub mod orchestrator;
pub mod time;

pub use error::{HeraldError, Result};
