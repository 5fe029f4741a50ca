//! Command line and environment configuration

use std::time::Duration;

use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "https://itunes.apple.com/search";
pub const DEFAULT_LANG: &str = "en_us";
pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "itunes-search",
    version,
    about = "Search the iTunes catalog from the terminal",
    long_about = None
)]
pub struct AppConfig {
    /// Search endpoint
    #[arg(long, env = "ITUNES_SEARCH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Result language sent with every query
    #[arg(long, env = "ITUNES_SEARCH_LANG", default_value = DEFAULT_LANG)]
    pub lang: String,

    /// Maximum number of results per search
    #[arg(long, env = "ITUNES_SEARCH_LIMIT", default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    /// Quiet period after the last keystroke before searching
    #[arg(long, env = "ITUNES_SEARCH_DEBOUNCE_MS", default_value_t = DEFAULT_DEBOUNCE_MS)]
    pub debounce_ms: u64,

    /// Cells per line in the grid view
    #[arg(long, env = "ITUNES_SEARCH_GRID_COLUMNS", default_value_t = 4)]
    pub grid_columns: usize,

    /// Request timeout for catalog and artwork fetches
    #[arg(long, env = "ITUNES_SEARCH_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            lang: self.lang.clone(),
            limit: self.limit,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Fixed parts of every query plus the debounce window
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchSettings {
    pub lang: String,
    pub limit: u32,
    pub debounce: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            limit: DEFAULT_LIMIT,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}
