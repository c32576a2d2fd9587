//! Date and time helpers anchored to a fixed timezone (IST by default).

mod parser;

pub use parser::NaturalDateParser;

use crate::config::TimeSettings;
use crate::error::Result;
use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// Format a timestamp as ISO 8601 with seconds and a `+HH:MM` offset.
pub fn format_iso(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Clock pinned to one UTC offset.
pub struct Clock {
    offset: FixedOffset,
    label: String,
    parser: NaturalDateParser,
}

impl Clock {
    pub fn new(offset: FixedOffset, label: &str) -> Self {
        Self {
            offset,
            label: label.to_string(),
            parser: NaturalDateParser::new(),
        }
    }

    /// Indian Standard Time (UTC+05:30).
    pub fn ist() -> Self {
        Self::new(
            FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("valid IST offset"),
            "IST",
        )
    }

    pub fn from_settings(settings: &TimeSettings) -> Result<Self> {
        Ok(Self::new(settings.offset()?, &settings.label))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Current calendar year in this zone.
    pub fn current_year(&self) -> i32 {
        self.now().year()
    }

    /// Today's date as `YYYY-MM-DD`.
    pub fn current_date(&self) -> String {
        self.now().format("%Y-%m-%d").to_string()
    }

    /// Parse free text into an ISO 8601 timestamp in this zone.
    pub fn parse(&self, text: &str) -> Result<String> {
        self.parse_at(text, self.now())
    }

    /// Like [`Clock::parse`], resolving relative expressions against `now`.
    pub fn parse_at(&self, text: &str, now: DateTime<FixedOffset>) -> Result<String> {
        let now = now.with_timezone(&self.offset);
        let parsed = self.parser.parse(text, now)?;
        Ok(format_iso(&parsed))
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::ist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeraldError;
    use regex::Regex;

    #[test]
    fn test_current_year_matches_zone_date() {
        let clock = Clock::ist();
        let year = clock.current_year();
        let date = clock.current_date();
        assert!(date.starts_with(&year.to_string()));
    }

    #[test]
    fn test_current_date_format() {
        let clock = Clock::ist();
        let date = clock.current_date();
        let pattern = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
        assert!(pattern.is_match(&date), "unexpected date {}", date);

        let expected = Utc::now()
            .with_timezone(&FixedOffset::east_opt(19800).unwrap())
            .format("%Y-%m-%d")
            .to_string();
        // Allow for a midnight rollover between the two reads.
        let retry = clock.current_date();
        assert!(date == expected || retry == expected);
    }

    #[test]
    fn test_parse_fixed_datetime_to_ist() {
        let clock = Clock::ist();
        assert_eq!(
            clock.parse("2025-06-26 17:00").unwrap(),
            "2025-06-26T17:00:00+05:30"
        );
    }

    #[test]
    fn test_parse_failure_is_date_parse_error() {
        let clock = Clock::ist();
        assert!(matches!(
            clock.parse("not a date at all"),
            Err(HeraldError::DateParse(_))
        ));
    }

    #[test]
    fn test_parse_at_converts_reference_into_zone() {
        let clock = Clock::ist();
        // 20:00 UTC is already the next day in IST.
        let now = DateTime::parse_from_rfc3339("2025-06-24T20:00:00Z").unwrap();
        assert_eq!(
            clock.parse_at("today", now).unwrap(),
            "2025-06-25T01:30:00+05:30"
        );
    }

    #[test]
    fn test_custom_offset_from_settings() {
        let settings = TimeSettings {
            utc_offset: "-04:00".to_string(),
            label: "EDT".to_string(),
        };
        let clock = Clock::from_settings(&settings).unwrap();
        assert_eq!(clock.label(), "EDT");
        assert_eq!(
            clock.parse("2025-06-26 17:00").unwrap(),
            "2025-06-26T17:00:00-04:00"
        );
    }
}
