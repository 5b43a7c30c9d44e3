//! Error types for the caption votes server.
//! Consolidates start-up failures from configuration, storage and the listener.
use caption_votes_repository::VoteStoreError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Store error: {0}")]
    Store(#[from] VoteStoreError),
    #[error("Seed error: {0}")]
    Seed(String),
    #[error("Telemetry error: {0}")]
    Telemetry(String),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
