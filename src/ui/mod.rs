pub mod chart;
pub mod dashboard;
pub mod projection;
pub mod views;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;
use ratatui::Frame;

use crate::event::AppEvent;
use crate::model::signal::SignalTable;
use crate::refresh::Trigger;

use chart::{RankingChart, ScatterChart};
use dashboard::{KeybindBar, LogPanel, NoticePanel, StatusBar};
use views::{ScatterView, FORECAST_VIEWS, OVERVIEW_VIEWS, RANKING_VIEWS};

const MAX_LOG_MESSAGES: usize = 200;
const LOG_PANEL_HEIGHT: u16 = 6;

pub struct AppState {
    pub table: Option<Arc<SignalTable>>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub from_cache: bool,
    pub last_trigger: Option<Trigger>,
    pub refreshing: bool,
    /// Reason the last cycle produced no table. Charts stay hidden while set.
    pub unavailable: Option<String>,
    pub ranking_limit: usize,
    pub refresh_interval_secs: u64,
    pub show_log: bool,
    pub log_messages: Vec<String>,
}

impl AppState {
    pub fn new(ranking_limit: usize, refresh_interval_secs: u64) -> Self {
        Self {
            table: None,
            fetched_at: None,
            from_cache: false,
            last_trigger: None,
            refreshing: false,
            unavailable: None,
            ranking_limit,
            refresh_interval_secs,
            show_log: true,
            log_messages: Vec::new(),
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::RefreshStarted(trigger) => {
                self.refreshing = true;
                if trigger == Trigger::Manual {
                    self.push_log("Manual refresh requested".to_string());
                }
            }
            AppEvent::SignalsReady(report) => {
                self.refreshing = false;
                self.unavailable = None;
                self.push_log(format!(
                    "[{}] {} assets scored, {} high ({})",
                    report.trigger,
                    report.table.len(),
                    report.table.high_signal_count(),
                    if report.from_cache { "cached" } else { "fresh" },
                ));
                self.fetched_at = Some(report.fetched_at);
                self.from_cache = report.from_cache;
                self.last_trigger = Some(report.trigger);
                self.table = Some(report.table);
            }
            AppEvent::DataUnavailable { trigger, reason } => {
                self.refreshing = false;
                self.push_log(format!("[{}] data unavailable: {}", trigger, reason));
                self.drop_table(trigger, reason);
            }
            AppEvent::Error(msg) => {
                self.refreshing = false;
                self.push_log(format!("error: {}", msg));
                let trigger = self.last_trigger.unwrap_or(Trigger::Scheduled);
                self.drop_table(trigger, msg);
            }
            AppEvent::LogMessage(msg) => self.push_log(msg),
        }
    }

    /// A failed cycle never leaves a stale chart set on screen.
    fn drop_table(&mut self, trigger: Trigger, reason: String) {
        self.table = None;
        self.fetched_at = None;
        self.from_cache = false;
        self.last_trigger = Some(trigger);
        self.unavailable = Some(reason);
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let log_height = if state.show_log { LOG_PANEL_HEIGHT } else { 0 };
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),          // status bar
            Constraint::Min(12),            // charts
            Constraint::Length(log_height), // system log
            Constraint::Length(1),          // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            fetched_at: state.fetched_at,
            from_cache: state.from_cache,
            last_trigger: state.last_trigger,
            refreshing: state.refreshing,
            unavailable: state.unavailable.is_some(),
            asset_count: state.table.as_ref().map_or(0, |t| t.len()),
            high_count: state.table.as_ref().map_or(0, |t| t.high_signal_count()),
        },
        outer[0],
    );

    match (&state.table, &state.unavailable) {
        (Some(table), _) => render_charts(frame, outer[1], table, state.ranking_limit),
        (None, Some(reason)) => frame.render_widget(
            NoticePanel {
                title: "Market Data Unavailable",
                message: reason,
                color: Color::Red,
            },
            outer[1],
        ),
        (None, None) => frame.render_widget(
            NoticePanel {
                title: "Loading",
                message: "Fetching the first market snapshot...",
                color: Color::DarkGray,
            },
            outer[1],
        ),
    }

    if state.show_log {
        frame.render_widget(LogPanel::new(&state.log_messages), outer[2]);
    }

    frame.render_widget(
        KeybindBar {
            refresh_interval_secs: state.refresh_interval_secs,
        },
        outer[3],
    );
}

fn render_charts(frame: &mut Frame, area: Rect, table: &SignalTable, ranking_limit: usize) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30), // market overview
            Constraint::Percentage(30), // breakout forecasts
            Constraint::Percentage(40), // rankings
        ])
        .split(area);

    render_scatter_row(frame, rows[0], table, &OVERVIEW_VIEWS);
    render_scatter_row(frame, rows[1], table, &FORECAST_VIEWS);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[2]);
    for (view, col) in RANKING_VIEWS.iter().zip(cols.iter()) {
        let ranked = table.ranking(view.column, ranking_limit);
        frame.render_widget(RankingChart::new(view, &ranked), *col);
    }
}

fn render_scatter_row(
    frame: &mut Frame,
    area: Rect,
    table: &SignalTable,
    views: &[ScatterView; 3],
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);
    for (view, col) in views.iter().zip(cols.iter()) {
        let points = table.scatter(view.x, view.y);
        frame.render_widget(ScatterChart::new(view, &points), *col);
    }
}
