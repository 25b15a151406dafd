use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "sreality";
const ENV_PREFIX: &str = "SREALITY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
    pub delays: DelayConfig,
}

/// Remote endpoint, fixed search filter and the headers sent with every request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub category_main_cb: u32,
    pub category_type_cb: u32,
    pub locality_region_id: u32,
    pub per_page: u32,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub referer: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub file_prefix: String,
    pub scrape_file_stem: String,
    pub combined_file: String,
}

/// Politeness pauses in milliseconds, drawn uniformly from `[min, max)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayConfig {
    pub enabled: bool,
    pub page_min_ms: u64,
    pub page_max_ms: u64,
    pub detail_min_ms: u64,
    pub detail_max_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://www.sreality.cz/api/cs/v2/estates".to_string(),
                category_main_cb: 1,
                category_type_cb: 2,
                locality_region_id: 10,
                per_page: 20,
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
                accept: "application/json".to_string(),
                accept_language: "cs-CZ,cs;q=0.9,en;q=0.8".to_string(),
                referer: "https://www.sreality.cz/".to_string(),
                timeout_seconds: 30,
            },
            output: OutputConfig {
                dir: PathBuf::from("data"),
                file_prefix: "sreality_".to_string(),
                scrape_file_stem: "sreality_prague_rent".to_string(),
                combined_file: "sreality_combined.csv".to_string(),
            },
            delays: DelayConfig {
                enabled: true,
                page_min_ms: 500,
                page_max_ms: 1500,
                detail_min_ms: 300,
                detail_max_ms: 1000,
            },
        }
    }
}

impl Config {
    /// Layer built-in defaults, an optional TOML file and `SREALITY_*` environment overrides.
    ///
    /// Without an explicit path, `sreality.toml` in the working directory is picked up if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = ::config::Config::try_from(&Config::default())
            .context("Failed to serialize default configuration")?;

        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = ::config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Query parameters selecting the fixed category/region filter for one result page
    pub fn page_query(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("category_main_cb", self.category_main_cb.to_string()),
            ("category_type_cb", self.category_type_cb.to_string()),
            ("locality_region_id", self.locality_region_id.to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", page.to_string()),
        ]
    }
}

impl OutputConfig {
    pub fn combined_path(&self) -> PathBuf {
        self.dir.join(&self.combined_file)
    }

    /// Output path for a scrape run: the explicit name inside the data directory,
    /// or a timestamped default
    pub fn scrape_path(&self, explicit: Option<&str>, timestamp: &str) -> PathBuf {
        match explicit {
            Some(name) => self.dir.join(name),
            None => self
                .dir
                .join(format!("{}_{}.csv", self.scrape_file_stem, timestamp)),
        }
    }
}

impl DelayConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            page_min_ms: 0,
            page_max_ms: 0,
            detail_min_ms: 0,
            detail_max_ms: 0,
        }
    }

    pub fn page_range(&self) -> Option<Range<u64>> {
        self.range(self.page_min_ms, self.page_max_ms)
    }

    pub fn detail_range(&self) -> Option<Range<u64>> {
        self.range(self.detail_min_ms, self.detail_max_ms)
    }

    fn range(&self, min: u64, max: u64) -> Option<Range<u64>> {
        if !self.enabled || max == 0 {
            return None;
        }
        // Bounds may be given in either order
        let low = min.min(max);
        let high = min.max(max);
        Some(low..high.max(low + 1))
    }
}
