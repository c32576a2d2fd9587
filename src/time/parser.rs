//! Natural-language date and time expressions.
//!
//! Expressions are resolved against a reference instant. Naive inputs are
//! read in the reference instant's offset; inputs carrying their own offset
//! are converted into it.

use crate::error::{HeraldError, Result};
use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Weekday,
};
use regex::{Captures, Regex};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S %:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M %:z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// chrono reads `%Y` from as few as one digit; shorter years are rejected.
const MIN_YEAR: i32 = 1000;

/// Zone names accepted as a trailing word, with their offsets in seconds.
const ZONE_NAMES: &[(&str, i32)] = &[("ist", 19_800), ("utc", 0), ("gmt", 0)];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Unit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    fn parse(word: &str) -> Option<Self> {
        let word = word.trim_end_matches('s');
        match word {
            "minute" | "min" => Some(Unit::Minute),
            "hour" | "hr" => Some(Unit::Hour),
            "day" => Some(Unit::Day),
            "week" => Some(Unit::Week),
            "month" => Some(Unit::Month),
            "year" => Some(Unit::Year),
            _ => None,
        }
    }
}

/// Parser for free-text temporal expressions.
pub struct NaturalDateParser {
    ordinal: Regex,
    time_suffix: Regex,
    ago: Regex,
    ahead: Regex,
    relative_period: Regex,
    weekday: Regex,
    month_day: Regex,
    month_year: Regex,
    zone: Regex,
}

impl NaturalDateParser {
    pub fn new() -> Self {
        let ordinal = Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b").expect("Invalid regex");

        let time_suffix = Regex::new(
            r"(?x)
            ^(?P<rest>.*?)\s*
            (?:
                (?:\bat\s+)?(?P<h12>\d{1,2})(?::(?P<m12>\d{2}))?\s*(?P<ampm>am|pm)
              | (?:\bat\s+)?(?P<h24>\d{1,2}):(?P<m24>\d{2})
              | \bat\s+(?P<hat>\d{1,2})
              | (?:\bat\s+|\bin\s+the\s+)?\b(?P<word>noon|midnight|morning|afternoon|evening|night|tonight)
            )$
        ",
        )
        .expect("Invalid regex");

        let ago = Regex::new(r"^(?P<n>\d+|a|an|one)\s+(?P<unit>[a-z]+)\s+ago$").expect("Invalid regex");
        let ahead = Regex::new(r"^in\s+(?P<n>\d+|a|an|one)\s+(?P<unit>[a-z]+)$").expect("Invalid regex");
        let relative_period = Regex::new(r"^(?P<dir>last|past|previous|next|coming|this)\s+(?P<unit>week|month|year)$")
            .expect("Invalid regex");
        let weekday = Regex::new(r"^(?:(?P<dir>last|previous|next|coming|this)\s+)?(?P<day>[a-z]+)$")
            .expect("Invalid regex");
        let month_day = Regex::new(
            r"^(?:(?P<d1>\d{1,2})\s+(?:of\s+)?(?P<m1>[a-z]+)|(?P<m2>[a-z]+)\s+(?P<d2>\d{1,2}))(?:\s+(?P<y>\d{4}))?$",
        )
        .expect("Invalid regex");
        let month_year = Regex::new(r"^(?P<m>[a-z]+)\s+(?P<y>\d{4})$").expect("Invalid regex");
        let zone = Regex::new(r"^(?P<rest>.+?)\s+(?P<zone>ist|utc|gmt)$").expect("Invalid regex");

        Self {
            ordinal,
            time_suffix,
            ago,
            ahead,
            relative_period,
            weekday,
            month_day,
            month_year,
            zone,
        }
    }

    /// Resolve `text` relative to `now`. The result carries `now`'s offset.
    pub fn parse(&self, text: &str, now: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
        let tz = *now.offset();
        let unparseable = || HeraldError::DateParse(text.to_string());

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(unparseable());
        }

        if let Some(dt) = parse_absolute(trimmed, &tz) {
            return Ok(dt);
        }

        let normalized = self.normalize(trimmed);

        // A trailing zone name reads the rest of the expression in that zone.
        let resolved = match self.zone.captures(&normalized) {
            Some(caps) => zone_offset(&caps["zone"]).and_then(|zone| {
                self.resolve(&caps["rest"], now.with_timezone(&zone))
                    .map(|dt| dt.with_timezone(&tz))
            }),
            None => self.resolve(&normalized, now),
        };

        resolved.ok_or_else(unparseable)
    }

    fn resolve(&self, normalized: &str, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        let tz = *now.offset();

        if let Some(dt) = parse_absolute(normalized, &tz) {
            return Some(dt);
        }

        let (date_part, time) = self.split_time_of_day(normalized);

        let base = if date_part.is_empty() {
            time.map(|_| now)
        } else {
            self.parse_date_part(&date_part, now)
        }?;

        match time {
            Some(t) => tz.from_local_datetime(&base.date_naive().and_time(t)).single(),
            None => Some(base),
        }
    }

    fn normalize(&self, text: &str) -> String {
        let lowered = text
            .to_lowercase()
            .replace("a.m.", "am")
            .replace("p.m.", "pm")
            .replace(',', " ");
        let collapsed = lowered
            .trim_end_matches('.')
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        self.ordinal.replace_all(&collapsed, "$1").into_owned()
    }

    /// Split a trailing time-of-day off the expression.
    fn split_time_of_day(&self, text: &str) -> (String, Option<NaiveTime>) {
        let Some(caps) = self.time_suffix.captures(text) else {
            return (text.to_string(), None);
        };

        match time_from_captures(&caps) {
            Some(time) => (caps["rest"].trim().to_string(), Some(time)),
            None => (text.to_string(), None),
        }
    }

    fn parse_date_part(&self, text: &str, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        let tz = *now.offset();

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return midnight(&tz, date);
            }
        }

        if let Some(date) = self.month_name_date(text, now.year()) {
            return midnight(&tz, date);
        }

        match text {
            "now" | "right now" | "today" => return Some(now),
            "tomorrow" => return now.checked_add_signed(TimeDelta::days(1)),
            "yesterday" => return now.checked_sub_signed(TimeDelta::days(1)),
            "day after tomorrow" | "the day after tomorrow" => {
                return now.checked_add_signed(TimeDelta::days(2))
            }
            "day before yesterday" | "the day before yesterday" => {
                return now.checked_sub_signed(TimeDelta::days(2))
            }
            _ => {}
        }

        if let Some(caps) = self.ago.captures(text) {
            let n = count(&caps["n"])?;
            let unit = Unit::parse(&caps["unit"])?;
            return shift(now, -n, unit);
        }

        if let Some(caps) = self.ahead.captures(text) {
            let n = count(&caps["n"])?;
            let unit = Unit::parse(&caps["unit"])?;
            return shift(now, n, unit);
        }

        if let Some(caps) = self.relative_period.captures(text) {
            let unit = Unit::parse(&caps["unit"])?;
            let n = match &caps["dir"] {
                "last" | "past" | "previous" => -1,
                "next" | "coming" => 1,
                _ => 0,
            };
            return shift(now, n, unit);
        }

        if let Some(caps) = self.weekday.captures(text) {
            let target = parse_weekday(&caps["day"])?;
            let direction = caps.name("dir").map(|m| m.as_str());
            return resolve_weekday(now, target, direction);
        }

        None
    }

    /// Dates with a month name. A missing year is the current one; a missing
    /// day is the first of the month.
    fn month_name_date(&self, text: &str, current_year: i32) -> Option<NaiveDate> {
        if let Some(caps) = self.month_day.captures(text) {
            let (day, month) = match (caps.name("d1"), caps.name("m1")) {
                (Some(d), Some(m)) => (d, m),
                _ => (caps.name("d2")?, caps.name("m2")?),
            };
            let month = month_from_name(month.as_str())?;
            let day = day.as_str().parse().ok()?;
            let year = match caps.name("y") {
                Some(y) => y.as_str().parse().ok()?,
                None => current_year,
            };
            return NaiveDate::from_ymd_opt(year, month, day);
        }

        let caps = self.month_year.captures(text)?;
        let month = month_from_name(&caps["m"])?;
        NaiveDate::from_ymd_opt(caps["y"].parse().ok()?, month, 1)
    }
}

impl Default for NaturalDateParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_absolute(text: &str, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let parsed = parse_absolute_any_year(text, tz)?;
    (parsed.year() >= MIN_YEAR).then_some(parsed)
}

fn parse_absolute_any_year(text: &str, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(tz));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(tz));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(tz));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return tz.from_local_datetime(&naive).single();
        }
    }

    None
}

fn midnight(tz: &FixedOffset, date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    if date.year() < MIN_YEAR {
        return None;
    }
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN)).single()
}

fn zone_offset(name: &str) -> Option<FixedOffset> {
    let (_, seconds) = ZONE_NAMES.iter().find(|(zone, _)| *zone == name)?;
    FixedOffset::east_opt(*seconds)
}

fn month_from_name(word: &str) -> Option<u32> {
    let month = match word {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn time_from_captures(caps: &Captures<'_>) -> Option<NaiveTime> {
    let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());

    if let Some(hour) = number("h12") {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let minute = number("m12").unwrap_or(0);
        let hour = match (&caps["ampm"], hour) {
            ("am", 12) => 0,
            ("am", h) => h,
            ("pm", 12) => 12,
            (_, h) => h + 12,
        };
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }

    if let Some(hour) = number("h24") {
        return NaiveTime::from_hms_opt(hour, number("m24").unwrap_or(0), 0);
    }

    if let Some(hour) = number("hat") {
        return NaiveTime::from_hms_opt(hour, 0, 0);
    }

    let hour = match caps.name("word")?.as_str() {
        "midnight" => 0,
        "morning" => 9,
        "noon" => 12,
        "afternoon" => 15,
        "evening" => 18,
        _ => 21,
    };
    NaiveTime::from_hms_opt(hour, 0, 0)
}

fn count(word: &str) -> Option<i64> {
    match word {
        "a" | "an" | "one" => Some(1),
        n => n.parse().ok(),
    }
}

fn shift(now: DateTime<FixedOffset>, n: i64, unit: Unit) -> Option<DateTime<FixedOffset>> {
    match unit {
        Unit::Minute => now.checked_add_signed(TimeDelta::try_minutes(n)?),
        Unit::Hour => now.checked_add_signed(TimeDelta::try_hours(n)?),
        Unit::Day => now.checked_add_signed(TimeDelta::try_days(n)?),
        Unit::Week => now.checked_add_signed(TimeDelta::try_weeks(n)?),
        Unit::Month => shift_months(now, n),
        Unit::Year => shift_months(now, n.checked_mul(12)?),
    }
}

fn shift_months(now: DateTime<FixedOffset>, n: i64) -> Option<DateTime<FixedOffset>> {
    let months = Months::new(u32::try_from(n.unsigned_abs()).ok()?);
    if n >= 0 {
        now.checked_add_months(months)
    } else {
        now.checked_sub_months(months)
    }
}

fn parse_weekday(word: &str) -> Option<Weekday> {
    match word {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Bare weekdays resolve to the most recent such day, today included.
fn resolve_weekday(
    now: DateTime<FixedOffset>,
    target: Weekday,
    direction: Option<&str>,
) -> Option<DateTime<FixedOffset>> {
    let today = i64::from(now.weekday().num_days_from_monday());
    let target = i64::from(target.num_days_from_monday());
    let back = (today - target).rem_euclid(7);
    let forward = (target - today).rem_euclid(7);

    let offset_days = match direction {
        None => -back,
        Some("last") | Some("previous") => {
            if back == 0 {
                -7
            } else {
                -back
            }
        }
        Some("next") | Some("coming") => {
            if forward == 0 {
                7
            } else {
                forward
            }
        }
        _ => target - today,
    };

    now.checked_add_signed(TimeDelta::days(offset_days))
}
