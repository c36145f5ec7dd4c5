use crate::utils::error::NavError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Landing,
    About,
    Research,
    Publications,
    Gallery,
}

impl Section {
    /// Navigation order; keyboard cycling follows it.
    pub const ALL: [Section; 5] = [
        Section::Landing,
        Section::About,
        Section::Research,
        Section::Publications,
        Section::Gallery,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Landing => "landing",
            Section::About => "about",
            Section::Research => "research",
            Section::Publications => "publications",
            Section::Gallery => "gallery",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Section::Landing => "Home",
            Section::About => "About",
            Section::Research => "Research",
            Section::Publications => "Publications",
            Section::Gallery => "Gallery",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Section {
        Section::ALL[(self.index() + 1) % Section::ALL.len()]
    }

    pub fn previous(self) -> Section {
        let len = Section::ALL.len();
        Section::ALL[(self.index() + len - 1) % len]
    }
}

impl Default for Section {
    fn default() -> Self {
        Section::Landing
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = NavError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.id() == value)
            .ok_or_else(|| NavError::InvalidSection {
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Desktop,
    Mobile,
}

/// Inline style states of a content section around its CSS transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStyle {
    Shown,
    Concealed,
}

impl SectionStyle {
    pub fn opacity(self) -> &'static str {
        match self {
            SectionStyle::Shown => "1",
            SectionStyle::Concealed => "0",
        }
    }

    pub fn transform(self) -> &'static str {
        match self {
            SectionStyle::Shown => "translateY(0)",
            SectionStyle::Concealed => "translateY(20px)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Key {
        match key {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub alt: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self { key, alt: false }
    }

    pub fn with_alt(key: Key) -> Self {
        Self { key, alt: true }
    }
}

/// An uncaught error reported by the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub message: String,
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

/// Raw navigation timing marks in milliseconds since the time origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationTiming {
    pub fetch_start: f64,
    pub dom_content_loaded_event_start: f64,
    pub dom_content_loaded_event_end: f64,
    pub load_event_start: f64,
    pub load_event_end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadMetrics {
    pub dom_content_loaded_ms: i64,
    pub page_load_ms: i64,
    pub total_load_ms: i64,
}

impl From<NavigationTiming> for LoadMetrics {
    fn from(timing: NavigationTiming) -> Self {
        Self {
            dom_content_loaded_ms: (timing.dom_content_loaded_event_end
                - timing.dom_content_loaded_event_start)
                .round() as i64,
            page_load_ms: (timing.load_event_end - timing.load_event_start).round() as i64,
            total_load_ms: (timing.load_event_end - timing.fetch_start).round() as i64,
        }
    }
}

/// Analytics record emitted for every section change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
    pub section: Section,
    pub page_title: String,
}

impl SectionView {
    pub fn new(site_title: &str, section: Section) -> Self {
        Self {
            section,
            page_title: format!("{} - {}", site_title, section.display_name()),
        }
    }
}
