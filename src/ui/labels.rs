//! Display strings for each supported language.

use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
pub enum Language {
    #[default]
    #[serde(rename = "ja")]
    #[value(name = "ja")]
    Japanese,
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
}

/// Every user-visible string on the dashboard.
///
/// Series and index names double as the keys of exported records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub time: &'static str,
    pub temperature: &'static str,
    pub humidity: &'static str,
    pub temperature_chart: &'static str,
    pub humidity_chart: &'static str,
    pub combined_chart: &'static str,
    pub loading: &'static str,
    pub error_prefix: &'static str,
}

impl Default for Labels {
    fn default() -> Self {
        Self::japanese()
    }
}

impl Labels {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Japanese => Self::japanese(),
            Language::English => Self::english(),
        }
    }

    pub fn japanese() -> Self {
        Self {
            title: "Dashboard",
            subtitle: "部屋の情報を表示するダッシュボードです。",
            time: "日付",
            temperature: "室温",
            humidity: "湿度",
            temperature_chart: "室温グラフ",
            humidity_chart: "湿度グラフ",
            combined_chart: "室温・湿度グラフ",
            loading: "Loading...",
            error_prefix: "An error has occurred: ",
        }
    }

    pub fn english() -> Self {
        Self {
            title: "Dashboard",
            subtitle: "Temperature and humidity of the room.",
            time: "Time",
            temperature: "Temperature",
            humidity: "Humidity",
            temperature_chart: "Temperature",
            humidity_chart: "Humidity",
            combined_chart: "Temperature & Humidity",
            loading: "Loading...",
            error_prefix: "An error has occurred: ",
        }
    }
}
