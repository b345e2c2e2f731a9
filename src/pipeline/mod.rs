//! Cross-sectional scoring of one snapshot.
//!
//! Every standardized column depends on the whole batch, so the input is
//! materialized before any per-row value is derived.

pub mod stats;

use std::collections::HashSet;

use crate::error::AppError;
use crate::model::asset::AssetSnapshot;
use crate::model::signal::{DerivedMetrics, SignalClass, SignalRow, SignalTable};

pub use stats::zscore;

const RELATIVE_STRENGTH_WEIGHT_1D: f64 = 0.4;
const RELATIVE_STRENGTH_WEIGHT_1W: f64 = 0.6;

pub fn relative_strength(price_change_1d_pct: f64, price_change_1w_pct: f64) -> f64 {
    price_change_1d_pct * RELATIVE_STRENGTH_WEIGHT_1D
        + price_change_1w_pct * RELATIVE_STRENGTH_WEIGHT_1W
}

/// Score a batch of asset rows.
///
/// Flat or single-row batches produce zero z-scores. Only rows that break the
/// snapshot contract are rejected, as `AppError::InvalidInput`.
pub fn compute(rows: &[AssetSnapshot]) -> Result<SignalTable, AppError> {
    validate(rows)?;

    let price_1d: Vec<f64> = rows.iter().map(|r| r.price_change_1d_pct).collect();
    let volume: Vec<f64> = rows.iter().map(|r| r.volume).collect();
    let strength: Vec<f64> = rows
        .iter()
        .map(|r| relative_strength(r.price_change_1d_pct, r.price_change_1w_pct))
        .collect();

    let price_z = zscore(&price_1d);
    let volume_z = zscore(&volume);
    let strength_z = zscore(&strength);

    let scored = rows
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let composite_forecast = (price_z[i] + volume_z[i]) / 2.0;
            SignalRow {
                asset: asset.clone(),
                metrics: DerivedMetrics {
                    price_zscore_1d: price_z[i],
                    volume_zscore_1d: volume_z[i],
                    relative_strength: strength[i],
                    relative_strength_zscore: strength_z[i],
                    volatility_breakout: asset.price_change_1d_pct.abs(),
                    composite_forecast,
                    htf_breakout_forecast: asset.price_change_1w_pct,
                    signal_class: SignalClass::from_composite(composite_forecast),
                },
            }
        })
        .collect();

    let table = SignalTable::from_rows(scored);
    tracing::debug!(
        assets = table.len(),
        high = table.high_signal_count(),
        "Scored snapshot"
    );
    Ok(table)
}

fn validate(rows: &[AssetSnapshot]) -> Result<(), AppError> {
    if rows.is_empty() {
        return Err(AppError::InvalidInput("empty batch".to_string()));
    }
    let mut seen: HashSet<&str> = HashSet::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let ticker = row.ticker.as_str();
        if ticker.trim().is_empty() {
            return Err(AppError::InvalidInput(format!("row {}: blank ticker", i)));
        }
        if ticker != ticker.to_uppercase() {
            return Err(AppError::InvalidInput(format!(
                "row {}: ticker '{}' is not uppercase",
                i, ticker
            )));
        }
        if !seen.insert(ticker) {
            return Err(AppError::InvalidInput(format!(
                "row {}: duplicate ticker '{}'",
                i, ticker
            )));
        }
        let fields = [
            ("price_change_1d_pct", row.price_change_1d_pct),
            ("price_change_1w_pct", row.price_change_1w_pct),
            ("volume", row.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(AppError::InvalidInput(format!(
                    "{}: {} is not finite ({})",
                    ticker, name, value
                )));
            }
        }
        if row.volume < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "{}: negative volume {}",
                ticker, row.volume
            )));
        }
    }
    Ok(())
}
