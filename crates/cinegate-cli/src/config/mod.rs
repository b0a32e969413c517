//! Application configuration module.
//!
//! Manages the TOML config file holding client settings such as the
//! gateway address used by `browse` and `search`.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
