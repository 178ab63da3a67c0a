//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use clap::ValueEnum;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;
use serde::Deserialize;

use crate::data::Series;

/// Theme selection from config or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Pick from the terminal background.
    #[default]
    Auto,
    Dark,
    Light,
}

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for error text.
    pub error: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Line color of the temperature series.
    pub temperature: Color,
    /// Line color of the humidity series.
    pub humidity: Color,
    /// Style for the page title.
    pub title: Style,
    /// Style for axis lines and labels.
    pub axis: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            error: Color::Red,
            border: Color::Gray,
            temperature: Color::LightRed,
            humidity: Color::LightBlue,
            title: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            error: Color::Red,
            border: Color::DarkGray,
            temperature: Color::Red,
            humidity: Color::Blue,
            title: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Auto => Self::auto_detect(),
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Line style for a series
    pub fn series_style(&self, series: Series) -> Style {
        match series {
            Series::Temperature => Style::default().fg(self.temperature),
            Series::Humidity => Style::default().fg(self.humidity),
        }
    }
}
