//! Configuration settings for Herald.

use crate::error::{HeraldError, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub news: NewsSettings,
    pub time: TimeSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level used when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Chat model settings shared by the router, greeter and news agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model used for intent elaboration, tool calling and greetings.
    pub model: String,
    /// Model used for the routing decision. Falls back to `model`.
    pub router_model: Option<String>,
    /// Base URL of an OpenAI-compatible endpoint. None uses the OpenAI default.
    pub api_base: Option<String>,
    /// Environment variable holding the chat API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Maximum model turns in one tool-calling run.
    pub max_iterations: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            router_model: None,
            api_base: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: 300,
            max_iterations: 8,
        }
    }
}

impl LlmSettings {
    /// Model used for routing decisions.
    pub fn router_model(&self) -> &str {
        self.router_model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.model)
    }
}

/// NewsAPI client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    /// API key. Prefer the environment variable named by `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable holding the API key (takes precedence).
    pub api_key_env: String,
    /// Base URL of the v2 API.
    pub base_url: String,
    /// Page size applied to top-headline requests that omit one.
    pub default_page_size: u32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: "NEWS_API_KEY".to_string(),
            base_url: "https://newsapi.org/v2".to_string(),
            default_page_size: 5,
            timeout_seconds: 30,
        }
    }
}

impl NewsSettings {
    /// Resolve the API key from the environment or the config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
    }
}

/// Fixed timezone used for date normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSettings {
    /// UTC offset in `+HH:MM` form.
    pub utc_offset: String,
    /// Display label for the zone.
    pub label: String,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            utc_offset: "+05:30".to_string(),
            label: "IST".to_string(),
        }
    }
}

impl TimeSettings {
    /// Parse `utc_offset` into a chrono offset.
    pub fn offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0)
            .ok_or_else(|| HeraldError::Config("Invalid UTC offset".to_string()));
    }

    let invalid = || HeraldError::Config(format!("Invalid UTC offset: {}", value));

    let (sign, rest) = match value.chars().next() {
        Some('+') => (1, &value[1..]),
        Some('-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HeraldError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("herald")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.news.default_page_size, 5);
        assert_eq!(settings.news.base_url, "https://newsapi.org/v2");
        assert_eq!(settings.time.utc_offset, "+05:30");
        assert_eq!(settings.llm.router_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_router_model_override() {
        let mut llm = LlmSettings::default();
        llm.router_model = Some("gpt-4.1-nano".to_string());
        assert_eq!(llm.router_model(), "gpt-4.1-nano");

        llm.router_model = Some(String::new());
        assert_eq!(llm.router_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+05:30").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_utc_offset("-0400").unwrap().local_minus_utc(), -14400);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("05:30").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
        assert!(parse_utc_offset("+5:3").is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [news]
            default_page_size = 10

            [llm]
            model = "gemini-2.0-flash"
            api_base = "https://generativelanguage.googleapis.com/v1beta/openai"
            "#,
        )
        .unwrap();

        assert_eq!(settings.news.default_page_size, 10);
        assert_eq!(settings.news.api_key_env, "NEWS_API_KEY");
        assert_eq!(settings.llm.model, "gemini-2.0-flash");
        assert_eq!(settings.llm.max_iterations, 8);
        assert_eq!(settings.time.label, "IST");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.news.api_key = Some("abc123".to_string());
        settings.time.utc_offset = "+01:00".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.news.api_key.as_deref(), Some("abc123"));
        assert_eq!(loaded.time.utc_offset, "+01:00");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.llm.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_resolve_api_key_from_config() {
        let news = NewsSettings {
            api_key: Some("from-config".to_string()),
            api_key_env: "HERALD_TEST_UNSET_NEWS_KEY".to_string(),
            ..NewsSettings::default()
        };
        assert_eq!(news.resolve_api_key().as_deref(), Some("from-config"));

        let empty = NewsSettings {
            api_key: Some(String::new()),
            api_key_env: "HERALD_TEST_UNSET_NEWS_KEY".to_string(),
            ..NewsSettings::default()
        };
        assert!(empty.resolve_api_key().is_none());
    }
}
