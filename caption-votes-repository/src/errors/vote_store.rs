//! Error types for vote store operations.
use caption_votes_shared::types::{CaptionId, ImageId};
use thiserror::Error;

/// Represents errors that can occur within a vote store.
///
/// Uniqueness violations are split out from generic database errors because
/// callers treat them as the authoritative "already voted" signal.
#[derive(Debug, Error)]
pub enum VoteStoreError {
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Caption not found: {0}")]
    MissingCaption(CaptionId),

    #[error("Image not found: {0}")]
    MissingImage(ImageId),

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Invalid vote value: {0}")]
    InvalidVoteValue(i16),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl VoteStoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, VoteStoreError::UniqueViolation { .. })
    }
}

impl From<sqlx::Error> for VoteStoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // SQLSTATE 23505
            if db_err.is_unique_violation() {
                return VoteStoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        VoteStoreError::DatabaseError(err)
    }
}
