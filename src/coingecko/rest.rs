use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::CoinGeckoConfig;
use crate::error::AppError;
use crate::model::asset::{AssetSnapshot, Snapshot};

use super::types::CoinMarketRow;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";
/// The scoring pipeline reads exactly these two windows.
const PRICE_CHANGE_WINDOWS: &str = "24h,7d";
const MAX_ERROR_BODY_CHARS: usize = 200;

pub struct CoinGeckoRestClient {
    http: reqwest::Client,
    markets_url: url::Url,
    api_key: Option<String>,
}

impl CoinGeckoRestClient {
    pub fn new(config: &CoinGeckoConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("breakout-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            markets_url: markets_url(config)?,
            api_key: config.api_key.clone(),
        })
    }

    pub fn markets_url(&self) -> &url::Url {
        &self.markets_url
    }

    /// Fetch one page of the market listing and map it into a snapshot.
    pub async fn fetch_snapshot(&self) -> Result<Snapshot, AppError> {
        tracing::debug!(url = %self.markets_url, "Requesting market listing");

        let mut request = self.http.get(self.markets_url.clone());
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            tracing::warn!(status = status.as_u16(), body = %excerpt, "Market listing rejected");
            return Err(AppError::DataUnavailable(format!(
                "CoinGecko returned status {}: {}",
                status, excerpt
            )));
        }

        let body = resp.text().await?;
        let snapshot = parse_markets(&body, Utc::now())?;
        tracing::info!(assets = snapshot.len(), "Market listing received");
        Ok(snapshot)
    }
}

fn markets_url(config: &CoinGeckoConfig) -> Result<url::Url, AppError> {
    let params = [
        ("vs_currency", config.vs_currency.clone()),
        ("order", config.order.clone()),
        ("per_page", config.per_page.to_string()),
        ("page", config.page.to_string()),
        ("sparkline", "false".to_string()),
        ("price_change_percentage", PRICE_CHANGE_WINDOWS.to_string()),
    ];
    url::Url::parse_with_params(&config.markets_url(), &params)
        .map_err(|e| AppError::Config(format!("invalid markets url: {}", e)))
}

/// Validate a `/coins/markets` body and map it into a snapshot.
///
/// Only the overall shape is fatal: the body must be a non-empty JSON array of
/// objects. Rows without a symbol, and repeats of an earlier ticker, are
/// dropped. Bad numeric fields coerce to 0.0.
pub fn parse_markets(body: &str, fetched_at: DateTime<Utc>) -> Result<Snapshot, AppError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::DataUnavailable(format!("malformed response body: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(AppError::DataUnavailable(format!(
                "expected a JSON array of markets, got {}",
                json_kind(&other)
            )))
        }
    };
    if items.is_empty() {
        return Err(AppError::DataUnavailable(
            "CoinGecko returned an empty market list".to_string(),
        ));
    }

    let rows: Vec<CoinMarketRow> = serde_json::from_value(Value::Array(items))
        .map_err(|e| AppError::DataUnavailable(format!("malformed market record: {}", e)))?;

    let mut seen = HashSet::with_capacity(rows.len());
    let mut assets = Vec::with_capacity(rows.len());
    for (rank, row) in rows.iter().enumerate() {
        let Some(ticker) = row.ticker() else {
            tracing::warn!(rank, id = %row.id, "Skipping market row without symbol");
            continue;
        };
        if !seen.insert(ticker.clone()) {
            tracing::warn!(rank, ticker = %ticker, id = %row.id, "Skipping repeated ticker");
            continue;
        }
        assets.push(AssetSnapshot::new(
            ticker,
            row.price_change_1d_pct(),
            row.price_change_1w_pct(),
            row.volume(),
        ));
    }

    Snapshot::new(assets, fetched_at).ok_or_else(|| {
        AppError::DataUnavailable("no market row carried a usable symbol".to_string())
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
