pub mod cache;
pub mod coingecko;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod refresh;
pub mod ui;
