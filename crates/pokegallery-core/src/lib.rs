use std::time::Duration;
use thiserror::Error;

pub mod config_file;
pub mod debounce;
pub mod detail;
pub mod join;
pub mod model;
pub mod name_index;
pub mod query;
pub mod source;
pub mod table;

// Re-export for convenience
pub use debounce::Debouncer;
pub use detail::{DetailView, load_detail};
pub use model::{DetailRecord, RecordPage, RecordRef, Species};
pub use name_index::NameIndex;
pub use query::{
    ApplyOutcome, BatchOutcome, Executor, FetchPlan, Mode, Notice, NoticeLevel, QueryController,
    QueryInputs, QueryState, SearchStrategy, Ticket, ViewSnapshot,
};
pub use source::{DetailKey, RecordSource, SourceError, pokeapi::PokeApi};
pub use table::CatalogTable;

/// Public PokeAPI root.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Listing `limit` used to pull the whole name index in one request.
pub const DEFAULT_BULK_LIMIT: usize = 100_000;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid base URL {0:?}: expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Resolved runtime configuration shared by the CLI and TUI.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
    /// `limit` for the one-off bulk listing used by substring search.
    pub bulk_limit: usize,
    pub page_size: usize,
    pub debounce_ms: u64,
    pub search_strategy: SearchStrategy,
    /// Maximum number of substring matches whose details are fetched.
    pub search_cap: usize,
    pub table_fetch_limit: usize,
    pub table_page_size: usize,
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            bulk_limit: DEFAULT_BULK_LIMIT,
            page_size: query::DEFAULT_PAGE_SIZE,
            debounce_ms: query::DEFAULT_DEBOUNCE_MS,
            search_strategy: SearchStrategy::default(),
            search_cap: query::DEFAULT_SEARCH_CAP,
            table_fetch_limit: table::DEFAULT_FETCH_LIMIT,
            table_page_size: table::DEFAULT_PAGE_SIZE,
            theme: "classic".to_string(),
        }
    }
}

impl Config {
    /// Build a config from a (possibly partial) config file, falling back to
    /// defaults for every absent field.
    pub fn from_file(file: &config_file::ConfigFile) -> Self {
        let mut config = Self::default();
        if let Some(api) = &file.api {
            if let Some(url) = &api.base_url {
                config.base_url = url.clone();
            }
            if let Some(secs) = api.timeout_secs {
                config.timeout_secs = secs;
            }
            if let Some(limit) = api.bulk_limit {
                config.bulk_limit = limit;
            }
        }
        if let Some(q) = &file.query {
            if let Some(size) = q.page_size {
                config.page_size = size.max(1);
            }
            if let Some(ms) = q.debounce_ms {
                config.debounce_ms = ms;
            }
            if let Some(strategy) = q.search_strategy {
                config.search_strategy = strategy;
            }
            if let Some(cap) = q.search_cap {
                config.search_cap = cap.max(1);
            }
        }
        if let Some(t) = &file.table {
            if let Some(limit) = t.fetch_limit {
                config.table_fetch_limit = limit;
            }
            if let Some(size) = t.page_size {
                config.table_page_size = size.max(1);
            }
        }
        if let Some(theme) = file.display.as_ref().and_then(|d| d.theme.clone()) {
            config.theme = theme;
        }
        config
    }

    /// Apply `POKEGALLERY_*` environment overrides. Unparseable values are
    /// ignored with a warning.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("POKEGALLERY_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(raw) = std::env::var("POKEGALLERY_TIMEOUT") {
            match raw.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid POKEGALLERY_TIMEOUT"),
            }
        }
        if let Ok(raw) = std::env::var("POKEGALLERY_STRATEGY") {
            match raw.parse() {
                Ok(strategy) => self.search_strategy = strategy,
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring POKEGALLERY_STRATEGY"),
            }
        }
        self
    }

    /// Every resolved value as a complete config file.
    pub fn to_file(&self) -> config_file::ConfigFile {
        use config_file::{ApiConfig, ConfigFile, DisplayConfig, QueryConfig, TableConfig};
        ConfigFile {
            api: Some(ApiConfig {
                base_url: Some(self.base_url.clone()),
                timeout_secs: Some(self.timeout_secs),
                bulk_limit: Some(self.bulk_limit),
            }),
            query: Some(QueryConfig {
                page_size: Some(self.page_size),
                debounce_ms: Some(self.debounce_ms),
                search_strategy: Some(self.search_strategy),
                search_cap: Some(self.search_cap),
            }),
            table: Some(TableConfig {
                fetch_limit: Some(self.table_fetch_limit),
                page_size: Some(self.table_page_size),
            }),
            display: Some(DisplayConfig {
                theme: Some(self.theme.clone()),
            }),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::{ApiConfig, ConfigFile, QueryConfig};

    #[test]
    fn defaults_match_the_public_api() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.search_cap, 20);
        assert_eq!(config.search_strategy, SearchStrategy::Substring);
        assert_eq!(config.table_fetch_limit, 50);
        assert_eq!(config.table_page_size, 5);
    }

    #[test]
    fn from_file_overrides_only_present_fields() {
        let file = ConfigFile {
            api: Some(ApiConfig {
                base_url: Some("http://localhost:9000".into()),
                ..Default::default()
            }),
            query: Some(QueryConfig {
                search_strategy: Some(SearchStrategy::Direct),
                page_size: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = Config::from_file(&file);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.search_strategy, SearchStrategy::Direct);
        // Zero page size is clamped rather than dividing by zero later.
        assert_eq!(config.page_size, 1);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.debounce_ms, 500);
    }
}
