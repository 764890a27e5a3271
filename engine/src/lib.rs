pub mod api;
pub mod attachment;
pub mod cli;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod output;
pub mod poll;
pub mod retry;
pub mod tools;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::GrsaiClient;
pub use error::{InputError, SkillError};

pub const API_KEY_ENV: &str = "GRSAI_API_KEY";
pub const BASE_URL_ENV: &str = "GRSAI_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://grsaiapi.com";

/// Logs to stderr at `info` unless `RUST_LOG` says otherwise. Call once, from `main`.
pub fn init_logging() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();
}
