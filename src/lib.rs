pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use app::simulator::{SessionReport, Simulator};
#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "web")]
pub use adapters::web::{boot, DomPage, SiteNavigator};

pub use adapters::memory::{MemoryPage, RecordingAnalytics};
pub use config::toml_config::NavConfig;
pub use core::navigator::{NavOutcome, SectionNavigator};
pub use core::runtime::{EventResponse, PageEvent, Runtime};
pub use domain::model::{Key, KeyInput, LayoutMode, Section};
pub use utils::error::{NavError, Result};
