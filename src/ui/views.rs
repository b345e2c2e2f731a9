use ratatui::style::Color;

use crate::model::signal::{Column, SignalClass};

pub const NORMAL_COLOR: Color = Color::Rgb(0x5D, 0xAD, 0xE2);
pub const HIGH_COLOR: Color = Color::Rgb(0xFF, 0xA5, 0x00);
pub const STRENGTH_BAR_COLOR: Color = Color::Rgb(0xEF, 0x8E, 0x5B);
pub const REFERENCE_LINE_COLOR: Color = Color::DarkGray;

pub fn signal_color(class: SignalClass) -> Color {
    match class {
        SignalClass::High => HIGH_COLOR,
        SignalClass::Normal => NORMAL_COLOR,
    }
}

/// A scatter of two table columns, points colored by signal class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterView {
    pub x: Column,
    pub y: Column,
    pub title: &'static str,
}

/// A horizontal bar ranking of one column against tickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingView {
    pub column: Column,
    pub title: &'static str,
    pub bar_color: Color,
}

/// Market overview row.
pub const OVERVIEW_VIEWS: [ScatterView; 3] = [
    ScatterView {
        x: Column::PriceChange1w,
        y: Column::PriceChange1d,
        title: "Price Change",
    },
    ScatterView {
        x: Column::VolumeZScore1d,
        y: Column::PriceZScore1d,
        title: "Volume Z-Score",
    },
    ScatterView {
        x: Column::RelativeStrengthZScore,
        y: Column::PriceZScore1d,
        title: "Relative Strength",
    },
];

/// Breakout forecast row.
pub const FORECAST_VIEWS: [ScatterView; 3] = [
    ScatterView {
        x: Column::CompositeForecast,
        y: Column::PriceZScore1d,
        title: "Composite Breakout",
    },
    ScatterView {
        x: Column::VolatilityBreakout,
        y: Column::PriceZScore1d,
        title: "Volatility Breakout",
    },
    ScatterView {
        x: Column::HtfBreakoutForecast,
        y: Column::PriceZScore1d,
        title: "HTF Breakout",
    },
];

pub const RANKING_VIEWS: [RankingView; 4] = [
    RankingView {
        column: Column::CompositeForecast,
        title: "Composite Score",
        bar_color: NORMAL_COLOR,
    },
    RankingView {
        column: Column::VolatilityBreakout,
        title: "Volatility Score",
        bar_color: NORMAL_COLOR,
    },
    RankingView {
        column: Column::HtfBreakoutForecast,
        title: "HTF Score",
        bar_color: NORMAL_COLOR,
    },
    RankingView {
        column: Column::RelativeStrength,
        title: "Relative Strength",
        bar_color: STRENGTH_BAR_COLOR,
    },
];
