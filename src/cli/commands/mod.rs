//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod init;
mod news;
mod serve;
mod time;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use init::run_init;
pub use news::{run_everything, run_headlines, run_sources};
pub use serve::run_serve;
pub use time::{run_time_parse, run_time_today, run_time_year};
