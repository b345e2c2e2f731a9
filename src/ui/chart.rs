use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

use crate::model::signal::{RankedValue, ScatterPoint, SignalClass};

use super::projection::{axis_bounds, bar_span, format_value, ranking_range};
use super::views::{signal_color, RankingView, ScatterView, REFERENCE_LINE_COLOR};

const TICKER_WIDTH: u16 = 6;
const VALUE_WIDTH: u16 = 8;

fn chart_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

pub struct ScatterChart<'a> {
    view: &'a ScatterView,
    points: &'a [ScatterPoint],
}

impl<'a> ScatterChart<'a> {
    pub fn new(view: &'a ScatterView, points: &'a [ScatterPoint]) -> Self {
        Self { view, points }
    }
}

impl Widget for ScatterChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let x_bounds = axis_bounds(self.points.iter().map(|p| p.x));
        let y_bounds = axis_bounds(self.points.iter().map(|p| p.y));

        let select = |class: SignalClass| -> Vec<(f64, f64)> {
            self.points
                .iter()
                .filter(|p| p.signal_class == class)
                .map(|p| (p.x, p.y))
                .collect()
        };
        let normal = select(SignalClass::Normal);
        let high = select(SignalClass::High);
        let zero_x = [(x_bounds[0], 0.0), (x_bounds[1], 0.0)];
        let zero_y = [(0.0, y_bounds[0]), (0.0, y_bounds[1])];

        let reference = Style::default().fg(REFERENCE_LINE_COLOR);
        // High points go last so they stay visible where they overlap.
        let datasets = vec![
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(reference)
                .data(&zero_x),
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(reference)
                .data(&zero_y),
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(signal_color(SignalClass::Normal)))
                .data(&normal),
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(signal_color(SignalClass::High)))
                .data(&high),
        ];

        let label_style = Style::default().fg(Color::DarkGray);
        Chart::new(datasets)
            .block(chart_block(self.view.title))
            .x_axis(
                Axis::default()
                    .title(Span::styled(self.view.x.label(), label_style))
                    .style(label_style)
                    .bounds(x_bounds)
                    .labels(vec![
                        Span::raw(format_value(x_bounds[0])),
                        Span::raw(format_value(x_bounds[1])),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(self.view.y.label(), label_style))
                    .style(label_style)
                    .bounds(y_bounds)
                    .labels(vec![
                        Span::raw(format_value(y_bounds[0])),
                        Span::raw(format_value(y_bounds[1])),
                    ]),
            )
            .render(area, buf);
    }
}

/// Horizontal bars, one row per ticker, largest value on top.
pub struct RankingChart<'a> {
    view: &'a RankingView,
    ranked: &'a [RankedValue],
}

impl<'a> RankingChart<'a> {
    /// `ranked` is expected in ascending order, as `SignalTable::ranking` returns it.
    pub fn new(view: &'a RankingView, ranked: &'a [RankedValue]) -> Self {
        Self { view, ranked }
    }
}

impl Widget for RankingChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = chart_block(self.view.title);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.ranked.is_empty() || inner.height == 0 {
            return;
        }
        let track_width = inner.width.saturating_sub(TICKER_WIDTH + VALUE_WIDTH + 2);
        if track_width < 2 {
            return;
        }

        let visible = self.ranked.len().min(inner.height as usize);
        let shown = &self.ranked[self.ranked.len() - visible..];
        let (lo, hi) = ranking_range(shown.iter().map(|r| r.value));

        let label_style = Style::default().fg(Color::Gray);
        let bar_style = Style::default().fg(self.view.bar_color);
        let value_style = Style::default().fg(Color::DarkGray);
        let track_x = inner.x + TICKER_WIDTH + 1;

        for (row, entry) in shown.iter().rev().enumerate() {
            let y = inner.y + row as u16;
            let ticker: String = entry.ticker.chars().take(TICKER_WIDTH as usize).collect();
            buf.set_string(
                inner.x,
                y,
                format!("{:>w$}", ticker, w = TICKER_WIDTH as usize),
                label_style,
            );

            let (start, len) = bar_span(entry.value, lo, hi, track_width);
            if len > 0 {
                buf.set_string(track_x + start, y, "█".repeat(len as usize), bar_style);
            }

            let value = format_value(entry.value);
            buf.set_string(
                track_x + track_width + 1,
                y,
                format!("{:>w$}", value, w = VALUE_WIDTH as usize),
                value_style,
            );
        }
    }
}
