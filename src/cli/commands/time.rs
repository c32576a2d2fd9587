//! Date helper commands.

use crate::cli::preflight::{self, Operation};
use crate::config::Settings;
use crate::time::Clock;
use anyhow::Result;

fn clock(settings: &Settings) -> Result<Clock> {
    preflight::check(Operation::Time, settings)?;
    Ok(Clock::from_settings(&settings.time)?)
}

/// Print today's date.
pub fn run_time_today(settings: &Settings) -> Result<()> {
    println!("{}", clock(settings)?.current_date());
    Ok(())
}

/// Print the current year.
pub fn run_time_year(settings: &Settings) -> Result<()> {
    println!("{}", clock(settings)?.current_year());
    Ok(())
}

/// Parse a date expression and print the ISO 8601 timestamp.
pub fn run_time_parse(text: &str, settings: &Settings) -> Result<()> {
    println!("{}", clock(settings)?.parse(text)?);
    Ok(())
}
