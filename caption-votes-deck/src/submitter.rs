//! Port through which the deck reaches the vote endpoint.
use async_trait::async_trait;
use caption_votes_shared::types::{CaptionId, VoteValue};

use crate::errors::SubmissionError;

#[async_trait]
pub trait SubmitVote: Send + Sync {
    /// Submits one vote. Runs to completion; there is no cancellation.
    async fn submit(
        &self,
        caption_id: &CaptionId,
        vote_value: VoteValue,
    ) -> Result<(), SubmissionError>;
}
