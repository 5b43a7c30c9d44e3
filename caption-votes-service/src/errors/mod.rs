//! Error types for the caption votes service.
//! Every failure of the vote endpoint and of the queue seed maps onto one of
//! these variants, and each variant onto exactly one HTTP status.
use caption_votes_repository::VoteStoreError;
use caption_votes_shared::messages;
use thiserror::Error;
use tracing::error;

/// Bad shape or value of the vote request.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", messages::INVALID_JSON_BODY)]
    InvalidJson,
    #[error("{}", messages::CAPTION_ID_REQUIRED)]
    CaptionIdRequired,
    #[error("{}", messages::INVALID_VOTE_VALUE)]
    InvalidVoteValue,
}

/// Represents the outcomes of a failed vote submission or queue load.
///
/// The `Display` text is the user-visible message of the endpoint.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoteError {
    #[error("{}", messages::UNAUTHORIZED)]
    Unauthorized,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", messages::CAPTION_NOT_FOUND)]
    CaptionNotFound,
    /// Raised both by the pre-insert check and by a uniqueness violation on insert.
    #[error("{}", messages::ALREADY_VOTED)]
    AlreadyVoted,
    #[error("{0}")]
    Internal(String),
}

impl VoteError {
    /// HTTP status the endpoint answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            VoteError::Unauthorized => 401,
            VoteError::Validation(_) => 400,
            VoteError::CaptionNotFound => 404,
            VoteError::AlreadyVoted => 409,
            VoteError::Internal(_) => 500,
        }
    }

    /// Converts a store error, logging it once when it becomes a 500.
    pub fn store_failure(err: VoteStoreError) -> Self {
        let err = VoteError::from(err);
        if let VoteError::Internal(message) = &err {
            error!(error = %message, "Vote store failure");
        }
        err
    }
}

impl From<VoteStoreError> for VoteError {
    fn from(err: VoteStoreError) -> Self {
        match err {
            VoteStoreError::UniqueViolation { .. } => VoteError::AlreadyVoted,
            VoteStoreError::MissingCaption(_) => VoteError::CaptionNotFound,
            other => VoteError::Internal(other.to_string()),
        }
    }
}
