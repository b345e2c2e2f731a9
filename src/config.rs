use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const MAX_PER_PAGE: u32 = 250;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub coingecko: CoinGeckoConfig,
    pub refresh: RefreshConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoConfig {
    pub rest_base_url: String,
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
    pub request_timeout_secs: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub ranking_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_page() -> u32 {
    1
}

impl CoinGeckoConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Endpoint for the ranked market listing, without query parameters.
    pub fn markets_url(&self) -> String {
        format!("{}/coins/markets", self.rest_base_url.trim_end_matches('/'))
    }

    fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.rest_base_url)
            .with_context(|| format!("invalid rest_base_url '{}'", self.rest_base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "invalid rest_base_url '{}': scheme must be http or https",
                self.rest_base_url
            );
        }
        if self.vs_currency.trim().is_empty() {
            bail!("vs_currency must not be empty");
        }
        if self.order.trim().is_empty() {
            bail!("order must not be empty");
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            bail!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE,
                self.per_page
            );
        }
        if self.page == 0 {
            bail!("page must be >= 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be > 0");
        }
        Ok(())
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            bail!("refresh.interval_secs must be > 0");
        }
        if self.cache_ttl_secs == 0 {
            bail!("refresh.cache_ttl_secs must be > 0");
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("BREAKOUT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::from_path(&config_path)?;

        config.coingecko.api_key = std::env::var("COINGECKO_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    /// Parse and validate a config document without touching the environment.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.coingecko.validate().context("coingecko section is invalid")?;
        self.refresh.validate().context("refresh section is invalid")?;
        if self.ui.refresh_rate_ms == 0 {
            bail!("ui.refresh_rate_ms must be > 0");
        }
        if self.ui.ranking_limit == 0 {
            bail!("ui.ranking_limit must be > 0");
        }
        Ok(())
    }
}
