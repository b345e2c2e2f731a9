use serde::Deserialize;
use serde_json::Value;

/// Lenient numeric coercion for market fields.
///
/// Numbers and numeric strings pass through; `null`, missing fields, garbage
/// and non-finite values become 0.0.
pub fn coerce_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// One element of `GET /coins/markets`.
///
/// Only the fields the dashboard scores are kept. Numeric fields stay raw
/// JSON so a single bad value never fails the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarketRow {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub symbol: Value,
    #[serde(default)]
    pub price_change_percentage_24h_in_currency: Value,
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Value,
    #[serde(default)]
    pub total_volume: Value,
}

impl CoinMarketRow {
    pub fn ticker(&self) -> Option<String> {
        self.symbol
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
    }

    pub fn price_change_1d_pct(&self) -> f64 {
        coerce_f64(&self.price_change_percentage_24h_in_currency)
    }

    pub fn price_change_1w_pct(&self) -> f64 {
        coerce_f64(&self.price_change_percentage_7d_in_currency)
    }

    pub fn volume(&self) -> f64 {
        coerce_f64(&self.total_volume).max(0.0)
    }
}
