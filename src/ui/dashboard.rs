use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::refresh::Trigger;

use super::views::HIGH_COLOR;

pub struct StatusBar {
    pub fetched_at: Option<DateTime<Utc>>,
    pub from_cache: bool,
    pub last_trigger: Option<Trigger>,
    pub refreshing: bool,
    pub unavailable: bool,
    pub asset_count: usize,
    pub high_count: usize,
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));

        let state = if self.refreshing {
            Span::styled("REFRESHING", Style::default().fg(Color::Yellow))
        } else if self.unavailable {
            Span::styled("UNAVAILABLE", Style::default().fg(Color::Red))
        } else if self.fetched_at.is_some() {
            Span::styled("LIVE", Style::default().fg(Color::Green))
        } else {
            Span::styled("WAITING", Style::default().fg(Color::DarkGray))
        };

        let fetched = match self.fetched_at {
            Some(ts) => format!("fetched {}", ts.format("%H:%M:%S UTC")),
            None => "fetched --:--:--".to_string(),
        };
        let origin = match (self.fetched_at, self.from_cache) {
            (None, _) => "",
            (Some(_), true) => " (cached)",
            (Some(_), false) => " (fresh)",
        };

        let mut spans = vec![
            Span::styled(
                " Breakout Dashboard ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            sep(),
            state,
            sep(),
            Span::styled(
                format!("{}{}", fetched, origin),
                Style::default().fg(Color::Cyan),
            ),
            sep(),
            Span::styled(
                format!("assets: {}", self.asset_count),
                Style::default().fg(Color::White),
            ),
            sep(),
            Span::styled(
                format!("high: {}", self.high_count),
                Style::default().fg(HIGH_COLOR),
            ),
        ];
        if let Some(trigger) = self.last_trigger {
            spans.push(sep());
            spans.push(Span::styled(
                format!("trigger: {}", trigger),
                Style::default().fg(Color::DarkGray),
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// Full-body panel shown instead of the charts when there is no table.
pub struct NoticePanel<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub color: Color,
}

impl Widget for NoticePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.color));
        let lines = vec![
            Line::from(Span::styled(self.message, Style::default().fg(self.color))),
            Line::from(""),
            Line::from(Span::styled(
                "Press [R] to retry now.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" System Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner_height = block.inner(area).height as usize;

        let start = self.messages.len().saturating_sub(inner_height);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|msg| Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Gray))))
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar {
    pub refresh_interval_secs: u64,
}

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" [Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[R]", Style::default().fg(Color::Yellow)),
            Span::styled("efresh now  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[L]", Style::default().fg(Color::Yellow)),
            Span::styled("og  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!(
                    "auto-refresh every {}s · source: CoinGecko public API",
                    self.refresh_interval_secs
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
