//! Common UI components shared around the dashboard.
//!
//! This module contains the header, subtitle, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_duration;
use crate::query::QueryState;

/// Render the title line with the feed description.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(format!(" {} ", app.labels.title), app.theme.title),
        Span::styled(
            format!("│ {}", app.source_description()),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the one-line description under the title.
pub fn render_subtitle(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new(format!(" {}", app.labels.subtitle))
        .style(Style::default().fg(app.theme.border));
    frame.render_widget(paragraph, area);
}

/// Render the status bar at the bottom.
///
/// Shows: query state, time since last update, refresh interval, controls.
/// Temporary status messages take the whole bar while they last.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let paragraph =
        Paragraph::new(status_text(app)).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

fn status_text(app: &App) -> String {
    let mut parts = Vec::new();

    parts.push(match (&app.state, app.last_updated()) {
        (QueryState::Loading, _) => "Loading...".to_string(),
        (QueryState::Error(reason), _) => format!("Error: {}", reason),
        (QueryState::Success(_), Some(at)) => {
            format!("Updated {:.1}s ago", at.elapsed().as_secs_f64())
        }
        (QueryState::Success(_), None) => "Updated".to_string(),
    });

    if app.is_fetching() {
        parts.push("fetching ⟳".to_string());
    }

    if let Some(interval) = app.refresh_interval() {
        parts.push(format!("every {}", format_duration(interval)));
    }

    parts.push("r:refresh e:export ?:help q:quit".to_string());

    format!(" {}", parts.join(" | "))
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.title)]),
        Line::from(""),
        Line::from("  r         Refresh readings"),
        Line::from("  e         Export to JSON"),
        Line::from("  ?         Toggle this help"),
        Line::from("  Esc       Close help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 36u16.min(area.width.saturating_sub(4));
    let help_height = 11u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
