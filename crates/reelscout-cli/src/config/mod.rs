//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB credentials, request
//! defaults and terminal browser tuning.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, BrowseConfig, TmdbConfig, TmdbCredentials};
pub use paths::resolve_config_path;
