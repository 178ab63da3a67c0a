//! Dashboard view: three line charts or a loading/error placeholder.
//!
//! The view is built in two steps. [`build_screen`] turns the query state
//! into a [`Screen`] (plain data, easy to test), and [`render`] draws it.
//!
//! ```text
//! ┌───────────────────┬───────────────────┐
//! │ temperature       │ humidity          │
//! │ (floor, ℃)        │ (floor, %)        │
//! ├───────────────────┴───────────────────┤
//! │ combined (both series, no floor)      │
//! └───────────────────────────────────────┘
//! ```

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph, Wrap},
    Frame,
};

use super::labels::Labels;
use super::theme::Theme;
use crate::data::{celsius, format_number, map_for_chart, percent};
use crate::data::{DisplayRecord, Series, TimeLabeler, ValueFormatter};
use crate::query::QueryState;

/// Upper bound on x-axis labels; fewer are shown on narrow charts.
const MAX_X_LABELS: usize = 6;

/// Y-axis minimums of the single-series charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSettings {
    pub temperature_floor: f64,
    pub humidity_floor: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            temperature_floor: 25.0,
            humidity_floor: 40.0,
        }
    }
}

/// One line on a chart. Points are `(index, value)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub name: String,
    pub series: Series,
    pub points: Vec<(f64, f64)>,
}

/// One chart card.
#[derive(Debug, Clone)]
pub struct ChartPanel {
    pub title: String,
    /// Time label for each index on the x-axis.
    pub x_labels: Vec<String>,
    pub series: Vec<SeriesData>,
    /// Forced y-axis minimum.
    pub y_floor: Option<f64>,
    /// Formats y-axis labels.
    pub formatter: ValueFormatter,
}

impl ChartPanel {
    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.x_labels.len().saturating_sub(1)).max(1) as f64]
    }

    /// Y range: the floor (or zero, extended down to negative data) up to the
    /// largest value.
    pub fn y_bounds(&self) -> [f64; 2] {
        let (min, max) = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, y)| y))
            .filter(|y| y.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));

        let lower = match self.y_floor {
            Some(floor) => floor,
            None if min.is_finite() => min.min(0.0),
            None => 0.0,
        };
        let upper = if max.is_finite() { max.max(lower) } else { lower };

        if upper - lower < f64::EPSILON {
            [lower, lower + 1.0]
        } else {
            [lower, upper]
        }
    }

    /// Formatted labels for the bottom, middle and top of the y-axis.
    pub fn y_labels(&self) -> Vec<String> {
        let [lo, hi] = self.y_bounds();
        [lo, (lo + hi) / 2.0, hi].iter().map(|&v| (self.formatter)(v)).collect()
    }
}

/// Everything the dashboard area can show.
#[derive(Debug, Clone)]
pub enum Screen {
    Loading(String),
    Error(String),
    Charts(Vec<ChartPanel>),
}

impl Screen {
    pub fn panels(&self) -> &[ChartPanel] {
        match self {
            Screen::Charts(panels) => panels,
            _ => &[],
        }
    }

    /// Placeholder text, if no charts are shown.
    pub fn message(&self) -> Option<&str> {
        match self {
            Screen::Loading(msg) | Screen::Error(msg) => Some(msg.as_str()),
            Screen::Charts(_) => None,
        }
    }
}

/// Build the screen for the current query state.
pub fn build_screen(
    state: &QueryState,
    settings: &ChartSettings,
    labels: &Labels,
    labeler: &TimeLabeler,
) -> Screen {
    match state {
        QueryState::Loading => Screen::Loading(labels.loading.to_string()),
        QueryState::Error(reason) => Screen::Error(format!("{}{}", labels.error_prefix, reason)),
        QueryState::Success(readings) => {
            let records = map_for_chart(readings, labeler);
            Screen::Charts(build_panels(&records, settings, labels))
        }
    }
}

fn build_panels(records: &[DisplayRecord], settings: &ChartSettings, labels: &Labels) -> Vec<ChartPanel> {
    let x_labels: Vec<String> = records.iter().map(|r| r.time_label.clone()).collect();

    let line = |series: Series, name: &str| SeriesData {
        name: name.to_string(),
        series,
        points: records.iter().enumerate().map(|(i, r)| (i as f64, series.value(r))).collect(),
    };

    vec![
        ChartPanel {
            title: labels.temperature_chart.to_string(),
            x_labels: x_labels.clone(),
            series: vec![line(Series::Temperature, labels.temperature)],
            y_floor: Some(settings.temperature_floor),
            formatter: celsius,
        },
        ChartPanel {
            title: labels.humidity_chart.to_string(),
            x_labels: x_labels.clone(),
            series: vec![line(Series::Humidity, labels.humidity)],
            y_floor: Some(settings.humidity_floor),
            formatter: percent,
        },
        ChartPanel {
            title: labels.combined_chart.to_string(),
            x_labels,
            series: vec![
                line(Series::Temperature, labels.temperature),
                line(Series::Humidity, labels.humidity),
            ],
            y_floor: None,
            formatter: format_number,
        },
    ]
}

/// Pick up to `max` labels spread evenly from first to last.
pub fn axis_labels(labels: &[String], max: usize) -> Vec<String> {
    if labels.len() <= max || max < 2 {
        return labels.iter().take(max.max(1)).cloned().collect();
    }

    let last = labels.len() - 1;
    (0..max).map(|k| labels[k * last / (max - 1)].clone()).collect()
}

/// Render the dashboard area.
pub fn render(frame: &mut Frame, screen: &Screen, theme: &Theme, area: Rect) {
    match screen {
        Screen::Loading(msg) => {
            render_message(frame, msg, Style::default().add_modifier(Modifier::DIM), area)
        }
        Screen::Error(msg) => render_message(frame, msg, Style::default().fg(theme.error), area),
        Screen::Charts(panels) => render_grid(frame, panels, theme, area),
    }
}

fn render_message(frame: &mut Frame, msg: &str, style: Style, area: Rect) {
    let paragraph = Paragraph::new(msg.to_string())
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    let y = area.y + area.height.saturating_sub(3) / 2;
    let centered = Rect::new(area.x, y, area.width, 3.min(area.height));
    frame.render_widget(paragraph, centered);
}

fn render_grid(frame: &mut Frame, panels: &[ChartPanel], theme: &Theme, area: Rect) {
    let rows = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);
    let top = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[0]);

    // Temperature | humidity on top, combined across the full width below
    let cells = [top[0], top[1], rows[1]];
    for (panel, cell) in panels.iter().zip(cells) {
        render_panel(frame, panel, theme, cell);
    }
}

fn render_panel(frame: &mut Frame, panel: &ChartPanel, theme: &Theme, area: Rect) {
    let datasets: Vec<Dataset> = panel
        .series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(s.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.series_style(s.series))
                .data(&s.points)
        })
        .collect();

    let max_labels = ((area.width / 10) as usize).clamp(2, MAX_X_LABELS);
    let x_labels: Vec<Line> =
        axis_labels(&panel.x_labels, max_labels).into_iter().map(Line::from).collect();
    let y_labels: Vec<Line> = panel.y_labels().into_iter().map(Line::from).collect();

    let block = Block::default()
        .title(format!(" {} ", panel.title))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(Axis::default().style(theme.axis).bounds(panel.x_bounds()).labels(x_labels))
        .y_axis(Axis::default().style(theme.axis).bounds(panel.y_bounds()).labels(y_labels))
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    frame.render_widget(chart, area);
}
