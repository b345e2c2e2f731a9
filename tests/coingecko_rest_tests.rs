use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use breakout_dashboard::coingecko::CoinGeckoRestClient;
use breakout_dashboard::config::CoinGeckoConfig;
use breakout_dashboard::error::AppError;

fn local_config(base_url: &str, request_timeout_secs: u64) -> CoinGeckoConfig {
    let _ = rustls::crypto::ring::default_provider().install_default();
    CoinGeckoConfig {
        rest_base_url: base_url.to_string(),
        vs_currency: "usd".to_string(),
        order: "market_cap_desc".to_string(),
        per_page: 100,
        page: 1,
        request_timeout_secs,
        api_key: None,
    }
}

async fn read_request_head(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Answers a single request with `status` and `body`, handing back the raw
/// request head it received.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (head_tx, head_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let head = read_request_head(&mut stream).await;
        let response = format!(
            concat!(
                "HTTP/1.1 {}\r\n",
                "content-type: application/json\r\n",
                "content-length: {}\r\n",
                "connection: close\r\n\r\n{}",
            ),
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
        let _ = head_tx.send(head);
    });

    (format!("http://{}/api/v3", addr), head_rx)
}

#[tokio::test]
async fn rate_limited_response_is_unavailable() {
    let (base_url, _head) = serve_once(
        "429 Too Many Requests",
        r#"{"status":{"error_code":429,"error_message":"rate limited"}}"#,
    )
    .await;
    let client = CoinGeckoRestClient::new(&local_config(&base_url, 5)).unwrap();

    match client.fetch_snapshot().await {
        Err(AppError::DataUnavailable(reason)) => {
            assert!(reason.contains("429"), "unexpected reason: {reason}");
            assert!(reason.contains("rate limited"));
        }
        other => panic!("expected data unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn silent_server_times_out_as_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = read_request_head(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(stream);
    });

    let base_url = format!("http://{}/api/v3", addr);
    let client = CoinGeckoRestClient::new(&local_config(&base_url, 1)).unwrap();

    match client.fetch_snapshot().await {
        Err(AppError::DataUnavailable(reason)) => {
            assert!(reason.contains("timed out"), "unexpected reason: {reason}");
        }
        other => panic!("expected a timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn successful_response_is_parsed_into_snapshot() {
    let (base_url, head_rx) = serve_once(
        "200 OK",
        concat!(
            r#"[{"symbol":"btc","price_change_percentage_24h_in_currency":1.5,"#,
            r#""total_volume":"x"},"#,
            r#"{"symbol":"eth","price_change_percentage_7d_in_currency":-2.0,"#,
            r#""total_volume":900}]"#,
        ),
    )
    .await;
    let mut config = local_config(&base_url, 5);
    config.api_key = Some("demo-key".to_string());
    let client = CoinGeckoRestClient::new(&config).unwrap();
    assert_eq!(client.markets_url().path(), "/api/v3/coins/markets");

    let snapshot = client.fetch_snapshot().await.unwrap();
    let assets = snapshot.assets();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets[0].ticker, "BTC");
    assert_eq!(assets[0].price_change_1d_pct, 1.5);
    assert_eq!(assets[0].volume, 0.0);
    assert_eq!(assets[1].ticker, "ETH");
    assert_eq!(assets[1].price_change_1w_pct, -2.0);
    assert_eq!(assets[1].volume, 900.0);

    let head = head_rx.await.unwrap().to_ascii_lowercase();
    assert!(head.starts_with("get /api/v3/coins/markets?"));
    assert!(head.contains("vs_currency=usd"));
    assert!(head.contains("per_page=100"));
    assert!(head.contains("x-cg-demo-api-key: demo-key"));
}

#[tokio::test]
async fn empty_listing_is_unavailable() {
    let (base_url, _head) = serve_once("200 OK", "[]").await;
    let client = CoinGeckoRestClient::new(&local_config(&base_url, 5)).unwrap();

    assert!(matches!(
        client.fetch_snapshot().await,
        Err(AppError::DataUnavailable(_))
    ));
}
