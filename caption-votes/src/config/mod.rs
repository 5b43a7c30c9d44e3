//! Configuration module for the caption votes server.
//! Defines the environment-driven settings and the dependency wiring.
mod dependencies;
mod settings;

pub use dependencies::{Dependencies, MemorySeed};
pub use settings::{ConfigError, LogFormat, Settings, StoreBackend};
