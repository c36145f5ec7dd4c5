pub mod binding;
pub mod keyboard;
pub mod layout;
pub mod navigator;
pub mod runtime;

pub use crate::domain::model::{KeyInput, LayoutMode, Section};
pub use crate::domain::ports::{Analytics, Page};
pub use crate::utils::error::Result;
