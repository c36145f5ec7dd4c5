// Adapters layer: concrete `Page` implementations.

pub mod memory;

#[cfg(feature = "web")]
pub mod web;
