#[cfg(feature = "cli")]
pub mod simulator;
