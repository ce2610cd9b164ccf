//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reelscout_api::tmdb::{Feed, MAX_PAGE};
use reelscout_browse::{DEFAULT_PAGE_CEILING, ScrollConfig};
use serde::{Deserialize, Serialize};

/// Placeholder shown instead of secrets.
const MASK: &str = "***";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB client settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Terminal browser settings.
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// TMDB client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// v4 read access token. `TMDB_API_TOKEN` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// v3 API key. `TMDB_API_KEY` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Response language.
    #[serde(default = "default_language")]
    pub language: String,
    /// Region filter (ISO 3166-1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Include adult content.
    #[serde(default)]
    pub include_adult: bool,
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Credentials resolved from the environment and the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmdbCredentials {
    /// Bearer token.
    Token(String),
    /// v3 API key.
    ApiKey(String),
}

fn default_language() -> String {
    String::from("en-US")
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            api_key: None,
            language: default_language(),
            region: None,
            include_adult: false,
            base_url: None,
        }
    }
}

impl TmdbConfig {
    /// Picks credentials: environment before config, token before key.
    ///
    /// # Errors
    ///
    /// Returns an error if no token or key is available.
    pub fn credentials(
        &self,
        env_token: Option<String>,
        env_key: Option<String>,
    ) -> Result<TmdbCredentials> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        if let Some(token) = non_empty(env_token).or_else(|| non_empty(self.api_token.clone())) {
            return Ok(TmdbCredentials::Token(token));
        }
        non_empty(env_key)
            .or_else(|| non_empty(self.api_key.clone()))
            .map(TmdbCredentials::ApiKey)
            .context(
                "TMDB_API_TOKEN or TMDB_API_KEY environment variable is required \
                 (or set [tmdb] api_token in config.toml)",
            )
    }
}

/// Terminal browser configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrowseConfig {
    /// Highest page a list will request. Capped at the TMDB limit.
    #[serde(default = "default_page_ceiling")]
    pub page_ceiling: u32,
    /// Rows from the bottom that trigger the next page.
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: u32,
    /// Scroll debounce in milliseconds.
    #[serde(default = "default_scroll_debounce_ms")]
    pub scroll_debounce_ms: u64,
    /// Search debounce in milliseconds.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Feed tabs, in path form (`movie/popular`, `trending/all/week`, ...).
    #[serde(default = "default_feeds")]
    pub feeds: Vec<String>,
}

const fn default_page_ceiling() -> u32 {
    DEFAULT_PAGE_CEILING
}

const fn default_scroll_threshold() -> u32 {
    5
}

const fn default_scroll_debounce_ms() -> u64 {
    200
}

const fn default_search_debounce_ms() -> u64 {
    500
}

fn default_feeds() -> Vec<String> {
    ["movie/popular", "tv/popular", "person/popular", "trending/all/week"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_ceiling: default_page_ceiling(),
            scroll_threshold: default_scroll_threshold(),
            scroll_debounce_ms: default_scroll_debounce_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            feeds: default_feeds(),
        }
    }
}

impl BrowseConfig {
    /// Parses the configured feed tabs.
    ///
    /// # Errors
    ///
    /// Returns an error if a feed string is not recognised.
    pub fn parsed_feeds(&self) -> Result<Vec<Feed>> {
        self.feeds
            .iter()
            .map(|f| {
                f.parse::<Feed>()
                    .with_context(|| format!("invalid feed in [browse] feeds: {f}"))
            })
            .collect()
    }

    /// Page ceiling for lists, clamped to `1..=MAX_PAGE`.
    #[must_use]
    pub fn list_page_ceiling(&self) -> u32 {
        self.page_ceiling.clamp(1, MAX_PAGE)
    }

    /// Scroll sensor tuning measured in terminal rows.
    #[must_use]
    pub fn scroll_config(&self) -> ScrollConfig {
        ScrollConfig {
            threshold: self.scroll_threshold,
            debounce: Duration::from_millis(self.scroll_debounce_ms),
            ..ScrollConfig::default()
        }
    }

    /// Search debounce window.
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Copy with secrets replaced, for display.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        let mask = |v: &mut Option<String>| {
            if v.is_some() {
                *v = Some(String::from(MASK));
            }
        };
        mask(&mut masked.tmdb.api_token);
        mask(&mut masked.tmdb.api_key);
        masked
    }
}
