//! Pre-flight checks before network operations.
//!
//! Validates that the required API keys are available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{HeraldError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Routed questions need the chat key and the news key.
    Ask,
    /// Direct news commands need the news key only.
    News,
    /// Date helpers run locally.
    Time,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask => {
            check_chat_key(settings)?;
            check_news_key(settings)?;
        }
        Operation::News => {
            check_news_key(settings)?;
        }
        Operation::Time => {
            settings.time.offset()?;
        }
    }
    Ok(())
}

/// Check that the chat model key is present.
fn check_chat_key(settings: &Settings) -> Result<()> {
    let var = &settings.llm.api_key_env;
    match std::env::var(var) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(HeraldError::Config(format!(
            "{} is empty. Set it with: export {}='sk-...'",
            var, var
        ))),
        Err(_) => Err(HeraldError::Config(format!(
            "{} not set. Set it with: export {}='sk-...'",
            var, var
        ))),
    }
}

/// Check that a NewsAPI key is available from env or config.
fn check_news_key(settings: &Settings) -> Result<()> {
    match settings.news.resolve_api_key() {
        Some(_) => Ok(()),
        None => Err(HeraldError::Config(format!(
            "NewsAPI key not set. Set it with: export {}='...' (or news.api_key in the config file)",
            settings.news.api_key_env
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_needs_no_keys() {
        assert!(check(Operation::Time, &Settings::default()).is_ok());
    }

    #[test]
    fn test_news_key_from_config() {
        let mut settings = Settings::default();
        settings.news.api_key_env = "HERALD_TEST_UNSET_NEWS_KEY".to_string();
        assert!(check(Operation::News, &settings).is_err());

        settings.news.api_key = Some("abc123".to_string());
        assert!(check(Operation::News, &settings).is_ok());
    }

    #[test]
    fn test_invalid_offset_fails_time_check() {
        let mut settings = Settings::default();
        settings.time.utc_offset = "IST".to_string();
        assert!(check(Operation::Time, &settings).is_err());
    }
}
