use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::Event;
use tokio::sync::{mpsc, watch};

use breakout_dashboard::cache::SnapshotCache;
use breakout_dashboard::coingecko::CoinGeckoRestClient;
use breakout_dashboard::config::Config;
use breakout_dashboard::event::AppEvent;
use breakout_dashboard::input::{is_quit_key, parse_main_command, UiCommand};
use breakout_dashboard::refresh::RefreshWorker;
use breakout_dashboard::ui::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists or set BREAKOUT_CONFIG");
            std::process::exit(1);
        }
    };

    // Log to a file so it doesn't interfere with the TUI
    let log_file = std::fs::File::create("breakout-dashboard.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let client = CoinGeckoRestClient::new(&config.coingecko)
        .context("failed to build CoinGecko client")?;

    tracing::info!(
        markets_url = %client.markets_url(),
        interval_secs = config.refresh.interval_secs,
        cache_ttl_secs = config.refresh.cache_ttl_secs,
        api_key = config.coingecko.api_key.is_some(),
        "Starting breakout-dashboard"
    );

    // Channels
    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(64);
    let (manual_tx, manual_rx) = mpsc::channel::<()>(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker = RefreshWorker::new(
        client,
        SnapshotCache::new(config.refresh.cache_ttl()),
        config.refresh.interval(),
    );
    let worker_handle = tokio::spawn(worker.run(manual_rx, app_tx, shutdown_rx));

    // Ctrl+C handler
    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });
    let mut quit_rx = shutdown_tx.subscribe();

    // TUI main loop
    let mut terminal = ratatui::init();
    let mut app_state = AppState::new(config.ui.ranking_limit, config.refresh.interval_secs);
    app_state.push_log("breakout-dashboard started | CoinGecko top markets".to_string());

    loop {
        terminal.draw(|frame| ui::render(frame, &app_state))?;

        if quit_rx.has_changed().unwrap_or(true) && *quit_rx.borrow_and_update() {
            break;
        }

        // Handle input (non-blocking with timeout)
        if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if is_quit_key(&key.code) {
                    tracing::info!("User quit");
                    break;
                }
                match parse_main_command(&key.code) {
                    Some(UiCommand::RefreshNow) => {
                        // A full queue already holds a pending manual refresh.
                        if manual_tx.try_send(()).is_err() {
                            tracing::debug!("Manual refresh already queued");
                        }
                    }
                    Some(UiCommand::ToggleLog) => app_state.show_log = !app_state.show_log,
                    None => {}
                }
            }
        }

        while let Ok(evt) = app_rx.try_recv() {
            app_state.apply_event(evt);
        }
    }

    let _ = shutdown_tx.send(true);
    ratatui::restore();
    drop(app_rx);
    if let Err(e) = worker_handle.await {
        tracing::warn!(error = %e, "Refresh worker ended abnormally");
    }
    tracing::info!("Shutdown complete");
    Ok(())
}
