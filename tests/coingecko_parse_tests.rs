use chrono::{TimeZone, Utc};
use serde_json::json;

use breakout_dashboard::coingecko::parse_markets;
use breakout_dashboard::coingecko::types::coerce_f64;
use breakout_dashboard::error::AppError;

fn fetched_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

fn is_unavailable(body: &str) -> bool {
    matches!(parse_markets(body, fetched_at()), Err(AppError::DataUnavailable(_)))
}

#[test]
fn maps_market_rows_into_snapshot() {
    let body = json!([
        {
            "id": "bitcoin",
            "symbol": "btc",
            "current_price": 67000.0,
            "price_change_percentage_24h_in_currency": 1.25,
            "price_change_percentage_7d_in_currency": -3.5,
            "total_volume": 28000000000.0
        },
        {
            "id": "ethereum",
            "symbol": " eth ",
            "price_change_percentage_24h_in_currency": -0.75,
            "price_change_percentage_7d_in_currency": 4.0,
            "total_volume": 15000000000u64
        }
    ])
    .to_string();

    let snapshot = parse_markets(&body, fetched_at()).unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.fetched_at(), fetched_at());

    let btc = &snapshot.assets()[0];
    assert_eq!(btc.ticker, "BTC");
    assert_eq!(btc.price_change_1d_pct, 1.25);
    assert_eq!(btc.price_change_1w_pct, -3.5);
    assert_eq!(btc.volume, 28_000_000_000.0);

    let eth = &snapshot.assets()[1];
    assert_eq!(eth.ticker, "ETH");
    assert_eq!(eth.volume, 15_000_000_000.0);
}

#[test]
fn empty_array_is_unavailable() {
    assert!(is_unavailable("[]"));
}

#[test]
fn non_array_bodies_are_unavailable() {
    assert!(is_unavailable(r#"{"status":{"error_code":429,"error_message":"rate limited"}}"#));
    assert!(is_unavailable("null"));
    assert!(is_unavailable("\"maintenance\""));
    assert!(is_unavailable("<html>bad gateway</html>"));
    assert!(is_unavailable(""));
}

#[test]
fn non_object_elements_are_unavailable() {
    assert!(is_unavailable("[1, 2, 3]"));
    assert!(is_unavailable(r#"[{"symbol": "btc"}, "eth"]"#));
}

#[test]
fn missing_and_bad_fields_coerce_to_zero() {
    let body = json!([
        {
            "symbol": "aaa",
            "price_change_percentage_7d_in_currency": 2.0,
            "total_volume": 10.0
        },
        {
            "symbol": "bbb",
            "price_change_percentage_24h_in_currency": null,
            "price_change_percentage_7d_in_currency": "not a number",
            "total_volume": {"nested": true}
        },
        {
            "symbol": "ccc",
            "price_change_percentage_24h_in_currency": "4.5",
            "price_change_percentage_7d_in_currency": [1, 2],
            "total_volume": -12.0
        }
    ])
    .to_string();

    let snapshot = parse_markets(&body, fetched_at()).unwrap();
    let assets = snapshot.assets();
    assert_eq!(assets.len(), 3);

    assert_eq!(assets[0].price_change_1d_pct, 0.0);
    assert_eq!(assets[0].price_change_1w_pct, 2.0);

    assert_eq!(assets[1].price_change_1d_pct, 0.0);
    assert_eq!(assets[1].price_change_1w_pct, 0.0);
    assert_eq!(assets[1].volume, 0.0);

    assert_eq!(assets[2].price_change_1d_pct, 4.5);
    assert_eq!(assets[2].price_change_1w_pct, 0.0);
    assert_eq!(assets[2].volume, 0.0);
}

#[test]
fn rows_without_symbol_are_skipped() {
    let body = json!([
        {"id": "ghost", "price_change_percentage_24h_in_currency": 1.0},
        {"symbol": "", "total_volume": 5.0},
        {"symbol": 42},
        {"symbol": "sol", "total_volume": 7.0}
    ])
    .to_string();

    let snapshot = parse_markets(&body, fetched_at()).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.assets()[0].ticker, "SOL");
}

#[test]
fn all_rows_without_symbol_is_unavailable() {
    assert!(is_unavailable(r#"[{"id": "x"}, {"symbol": "   "}]"#));
}

#[test]
fn repeated_ticker_keeps_highest_ranked_row() {
    let body = json!([
        {"id": "tether", "symbol": "usdt", "total_volume": 50.0},
        {"id": "bridged-tether", "symbol": "USDT", "total_volume": 1.0},
        {"id": "usd-coin", "symbol": "usdc", "total_volume": 9.0}
    ])
    .to_string();

    let snapshot = parse_markets(&body, fetched_at()).unwrap();
    let tickers: Vec<&str> = snapshot.assets().iter().map(|a| a.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["USDT", "USDC"]);
    assert_eq!(snapshot.assets()[0].volume, 50.0);
}

#[test]
fn coerce_handles_each_json_kind() {
    assert_eq!(coerce_f64(&json!(3.5)), 3.5);
    assert_eq!(coerce_f64(&json!(-2)), -2.0);
    assert_eq!(coerce_f64(&json!(" 1e3 ")), 1000.0);
    assert_eq!(coerce_f64(&json!("NaN")), 0.0);
    assert_eq!(coerce_f64(&json!("inf")), 0.0);
    assert_eq!(coerce_f64(&json!(true)), 0.0);
    assert_eq!(coerce_f64(&json!(null)), 0.0);
}
