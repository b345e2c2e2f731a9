pub mod rest;
pub mod types;

pub use rest::{parse_markets, CoinGeckoRestClient};
