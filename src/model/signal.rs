use serde::Serialize;

use super::asset::AssetSnapshot;

/// Composite forecasts strictly above this value are flagged as High.
pub const HIGH_SIGNAL_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalClass {
    High,
    Normal,
}

impl SignalClass {
    pub fn from_composite(composite_forecast: f64) -> Self {
        if composite_forecast > HIGH_SIGNAL_THRESHOLD {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Normal => "Normal",
        }
    }
}

impl std::fmt::Display for SignalClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub price_zscore_1d: f64,
    pub volume_zscore_1d: f64,
    pub relative_strength: f64,
    pub relative_strength_zscore: f64,
    pub volatility_breakout: f64,
    pub composite_forecast: f64,
    pub htf_breakout_forecast: f64,
    pub signal_class: SignalClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalRow {
    #[serde(flatten)]
    pub asset: AssetSnapshot,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

/// Numeric columns of the scored table, addressable by chart views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    PriceChange1d,
    PriceChange1w,
    Volume,
    PriceZScore1d,
    VolumeZScore1d,
    RelativeStrength,
    RelativeStrengthZScore,
    VolatilityBreakout,
    CompositeForecast,
    HtfBreakoutForecast,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::PriceChange1d,
        Column::PriceChange1w,
        Column::Volume,
        Column::PriceZScore1d,
        Column::VolumeZScore1d,
        Column::RelativeStrength,
        Column::RelativeStrengthZScore,
        Column::VolatilityBreakout,
        Column::CompositeForecast,
        Column::HtfBreakoutForecast,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PriceChange1d => "Price Change 1D%",
            Self::PriceChange1w => "Price Change 1W%",
            Self::Volume => "Volume",
            Self::PriceZScore1d => "Price Z-Score 1D",
            Self::VolumeZScore1d => "Volume Z-Score 1D",
            Self::RelativeStrength => "Relative Strength",
            Self::RelativeStrengthZScore => "Relative Strength Z-Score 1D",
            Self::VolatilityBreakout => "Volatility Breakout",
            Self::CompositeForecast => "Composite Forecast",
            Self::HtfBreakoutForecast => "HTF-Breakout Forecast",
        }
    }
}

impl SignalRow {
    pub fn ticker(&self) -> &str {
        &self.asset.ticker
    }

    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::PriceChange1d => self.asset.price_change_1d_pct,
            Column::PriceChange1w => self.asset.price_change_1w_pct,
            Column::Volume => self.asset.volume,
            Column::PriceZScore1d => self.metrics.price_zscore_1d,
            Column::VolumeZScore1d => self.metrics.volume_zscore_1d,
            Column::RelativeStrength => self.metrics.relative_strength,
            Column::RelativeStrengthZScore => self.metrics.relative_strength_zscore,
            Column::VolatilityBreakout => self.metrics.volatility_breakout,
            Column::CompositeForecast => self.metrics.composite_forecast,
            Column::HtfBreakoutForecast => self.metrics.htf_breakout_forecast,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub ticker: String,
    pub x: f64,
    pub y: f64,
    pub signal_class: SignalClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedValue {
    pub ticker: String,
    pub value: f64,
}

/// Scored cross-section for one snapshot, rows kept in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalTable {
    rows: Vec<SignalRow>,
}

impl SignalTable {
    pub(crate) fn from_rows(rows: Vec<SignalRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SignalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&SignalRow> {
        self.rows.iter().find(|row| row.ticker() == ticker)
    }

    pub fn column(&self, column: Column) -> Vec<f64> {
        self.rows.iter().map(|row| row.value(column)).collect()
    }

    pub fn scatter(&self, x: Column, y: Column) -> Vec<ScatterPoint> {
        self.rows
            .iter()
            .map(|row| ScatterPoint {
                ticker: row.asset.ticker.clone(),
                x: row.value(x),
                y: row.value(y),
                signal_class: row.metrics.signal_class,
            })
            .collect()
    }

    /// Ascending sort on `column`, keeping the last `limit` rows.
    ///
    /// The result stays ascending, so the largest value comes last.
    pub fn ranking(&self, column: Column, limit: usize) -> Vec<RankedValue> {
        let mut ranked: Vec<RankedValue> = self
            .rows
            .iter()
            .map(|row| RankedValue {
                ticker: row.asset.ticker.clone(),
                value: row.value(column),
            })
            .collect();
        ranked.sort_by(|a, b| a.value.total_cmp(&b.value));
        let skip = ranked.len().saturating_sub(limit);
        ranked.drain(..skip);
        ranked
    }

    pub fn high_signal_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.metrics.signal_class == SignalClass::High)
            .count()
    }
}
