//! Configuration module for Herald.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{ApiPrompts, GreetingPrompts, IntentPrompts, Prompts, RouterPrompts};
pub use settings::{
    parse_utc_offset, GeneralSettings, LlmSettings, NewsSettings, PromptSettings, Settings,
    TimeSettings,
};
