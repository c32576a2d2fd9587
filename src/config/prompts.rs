//! Prompt templates for Herald.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub router: RouterPrompts,
    pub greeting: GreetingPrompts,
    pub intent: IntentPrompts,
    pub api: ApiPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt for the routing decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterPrompts {
    pub system: String,
}

impl Default for RouterPrompts {
    fn default() -> Self {
        Self {
            system: r#"You route user messages for a news assistant. You never answer the message yourself.

Reply with exactly one word:
- "greeting" if the message is only a greeting or small talk, such as "hi", "hello", "hey there", "good morning" or "good evening".
- "news" for everything else: questions about headlines, articles, publishers, dates, or any other task.

Examples:
- "hello" -> greeting
- "hey there!" -> greeting
- "top business headlines in the US" -> news
- "articles about Tesla from last week" -> news
- "which English science sources exist?" -> news"#
                .to_string(),
        }
    }
}

/// Prompt for the greeting responder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingPrompts {
    pub system: String,
}

impl Default for GreetingPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a friendly news assistant greeting the user.

Greet them warmly. If you do not know their name yet, ask for it, and greet them by name once they tell you.
Mention briefly that you can find top headlines, search news articles, and list news sources.
Keep it to two or three sentences."#
                .to_string(),
        }
    }
}

/// Prompt for the intent elaboration step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentPrompts {
    pub system: String,
}

impl Default for IntentPrompts {
    fn default() -> Self {
        Self {
            system: r#"You restate what a user wants from a news assistant.

You do not call tools, write code, or mention APIs.

Your task:
1. Work out what the user is asking for.
2. Restate it as a clear, unambiguous description of their intent.
3. List any filters they implied: topic, language, date or time range, category, country, publisher.
4. Say whether they want current top headlines, a search of historical articles, or a list of news sources.

Format:
- One short sentence summarizing the request.
- Then the specific details (topic, time, place, filters) when present.

Examples:

Input: "Show me the latest headlines in India"
Output:
The user wants the current top headlines from India. They want recent updates for the country India and did not name a category or publisher.

Input: "Find articles about Tesla from last week"
Output:
The user wants to search news articles mentioning Tesla published during the past week. This is a historical article search, not current headlines.

Input: "What are the available tech news sources?"
Output:
The user wants a list of news sources covering technology, so they can see which publications exist in that category.

Do not add assumptions that are not in the user's message. Today's date is {{today}} ({{timezone}})."#
                .to_string(),
        }
    }
}

/// Prompt for the tool-calling news agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiPrompts {
    pub system: String,
}

impl Default for ApiPrompts {
    fn default() -> Self {
        Self {
            system: r#"You execute news lookups for an elaborated user intent using the tools provided, then summarize the results.

Tools:

1. get_everything: search articles from the past five years across many sources and blogs.
   Use it for topic searches, anything with a date or range ("yesterday", "last week", a specific day), specific publishers or domains, or when relevance or popularity matters.
   Parameters: q (supports "exact phrases", +required, -excluded, AND/OR/NOT with grouping), searchIn (title,description,content), sources (up to 20 ids), domains, excludeDomains, from, to (ISO 8601), language, sortBy (relevancy, popularity, publishedAt), pageSize (use 5), page.

2. get_top_headlines: current top headlines from today.
   Use it for breaking or trending news, or headlines by topic or country. Do not use it when the user mentions a past date or time range.
   Parameters: q, sources (cannot be combined with country or category), category (business, entertainment, general, health, science, sports, technology), language, country (2-letter code), pageSize (default 5), page.

3. get_sources: list publishers that provide top headlines.
   Use it to discover sources by category, language or country, or to look up a source id for the other tools.
   Parameters: category, language, country.

4. get_current_year: the current year.
5. parse_to_ist: convert a phrase like "tomorrow 5 PM" or "3 days ago" to an ISO 8601 timestamp in {{timezone}}.
6. get_current_date_ist: today's date in {{timezone}} as YYYY-MM-DD.

Instructions:
- Use the single tool that best matches the intent. Resolve relative dates with the date tools first when needed.
- Leave out parameters you have no value for. Never send null or empty strings.
- Format dates as ISO 8601 (YYYY-MM-DD, optionally with time).
- Present at most 5 items as a readable bullet list.
  For articles: title, source name, description when present, URL.
  For sources: name, id, description when present, country.

Today's date is {{today}} ({{timezone}})."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = crate::config::Settings::expand_path(dir);

            let router_path = custom_path.join("router.toml");
            if router_path.exists() {
                prompts.router = toml::from_str(&std::fs::read_to_string(&router_path)?)?;
            }

            let greeting_path = custom_path.join("greeting.toml");
            if greeting_path.exists() {
                prompts.greeting = toml::from_str(&std::fs::read_to_string(&greeting_path)?)?;
            }

            let intent_path = custom_path.join("intent.toml");
            if intent_path.exists() {
                prompts.intent = toml::from_str(&std::fs::read_to_string(&intent_path)?)?;
            }

            let api_path = custom_path.join("api.toml");
            if api_path.exists() {
                prompts.api = toml::from_str(&std::fs::read_to_string(&api_path)?)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
