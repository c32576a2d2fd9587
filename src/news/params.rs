//! Request parameter bags for the NewsAPI endpoints.
//!
//! Every field is optional. Values that are absent or empty never reach the
//! query string; everything else is forwarded as-is, without local
//! validation, so the remote API stays the single authority on what is
//! acceptable.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Query pairs in the order they are sent.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Conversion of a parameter bag into forwarded query pairs.
pub trait QueryParams {
    fn query_pairs(&self) -> QueryPairs;
}

/// Parameters for `/top-headlines`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TopHeadlinesParams {
    #[serde(default, deserialize_with = "lenient_string")]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sources: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(
        default,
        rename = "pageSize",
        alias = "page_size",
        deserialize_with = "lenient_u32"
    )]
    pub page_size: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page: Option<u32>,
}

impl TopHeadlinesParams {
    /// Fill in `page_size` when the caller left it out.
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        if self.page_size.is_none() {
            self.page_size = Some(page_size);
        }
        self
    }
}

impl QueryParams for TopHeadlinesParams {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = Vec::new();
        push_str(&mut pairs, "q", &self.q);
        push_str(&mut pairs, "sources", &self.sources);
        push_str(&mut pairs, "category", &self.category);
        push_str(&mut pairs, "language", &self.language);
        push_str(&mut pairs, "country", &self.country);
        push_num(&mut pairs, "pageSize", self.page_size);
        push_num(&mut pairs, "page", self.page);
        pairs
    }
}

/// Parameters for `/everything`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EverythingParams {
    #[serde(default, deserialize_with = "lenient_string")]
    pub q: Option<String>,
    #[serde(
        default,
        rename = "searchIn",
        alias = "search_in",
        deserialize_with = "lenient_string"
    )]
    pub search_in: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sources: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub domains: Option<String>,
    #[serde(
        default,
        rename = "excludeDomains",
        alias = "exclude_domains",
        deserialize_with = "lenient_string"
    )]
    pub exclude_domains: Option<String>,
    #[serde(default, alias = "from_param", deserialize_with = "lenient_string")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
    #[serde(
        default,
        rename = "sortBy",
        alias = "sort_by",
        deserialize_with = "lenient_string"
    )]
    pub sort_by: Option<String>,
    #[serde(
        default,
        rename = "pageSize",
        alias = "page_size",
        deserialize_with = "lenient_u32"
    )]
    pub page_size: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page: Option<u32>,
}

impl QueryParams for EverythingParams {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = Vec::new();
        push_str(&mut pairs, "q", &self.q);
        push_str(&mut pairs, "searchIn", &self.search_in);
        push_str(&mut pairs, "sources", &self.sources);
        push_str(&mut pairs, "domains", &self.domains);
        push_str(&mut pairs, "excludeDomains", &self.exclude_domains);
        push_str(&mut pairs, "from", &self.from);
        push_str(&mut pairs, "to", &self.to);
        push_str(&mut pairs, "language", &self.language);
        push_str(&mut pairs, "sortBy", &self.sort_by);
        push_num(&mut pairs, "pageSize", self.page_size);
        push_num(&mut pairs, "page", self.page);
        pairs
    }
}

/// Parameters for `/top-headlines/sources`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SourcesParams {
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
}

impl QueryParams for SourcesParams {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = Vec::new();
        push_str(&mut pairs, "category", &self.category);
        push_str(&mut pairs, "language", &self.language);
        push_str(&mut pairs, "country", &self.country);
        pairs
    }
}

fn push_str(pairs: &mut QueryPairs, name: &'static str, value: &Option<String>) {
    if let Some(v) = value {
        if !v.trim().is_empty() {
            pairs.push((name, v.clone()));
        }
    }
}

fn push_num(pairs: &mut QueryPairs, name: &'static str, value: Option<u32>) {
    if let Some(v) = value {
        pairs.push((name, v.to_string()));
    }
}

/// Accept strings, `null`, arrays of strings (joined with commas) and scalars.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Some(other) => Some(other.to_string()),
    })
}

/// Accept integers, numeric strings, `null` and `""`.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected a non-negative integer, got {}", n))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got '{}'", s))),
        Some(other) => Err(de::Error::custom(format!(
            "expected an integer, got {}",
            other
        ))),
    }
}
