use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CaptionId, UserId, VoteId};

/// Represents the signed judgment a user casts on a caption.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoteValue {
    /// Upvote, stored as `1`.
    Up,
    /// Downvote, stored as `-1`.
    Down,
}

impl VoteValue {
    pub fn as_i16(self) -> i16 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

/// Raised when a raw vote value is anything other than `1` or `-1`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid vote value: {0}")]
pub struct InvalidVoteValue(pub i64);

impl TryFrom<i64> for VoteValue {
    type Error = InvalidVoteValue;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(InvalidVoteValue(other)),
        }
    }
}

/// A persisted vote record.
///
/// At most one vote exists per (profile, image) across all captions of that image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    pub id: VoteId,
    pub caption_id: CaptionId,
    pub profile_id: UserId,
    pub vote_value: VoteValue,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// A vote about to be inserted. Both timestamps are taken from one clock reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVote {
    pub caption_id: CaptionId,
    pub profile_id: UserId,
    pub vote_value: VoteValue,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl NewVote {
    pub fn new(
        profile_id: UserId,
        caption_id: CaptionId,
        vote_value: VoteValue,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            caption_id,
            profile_id,
            vote_value,
            created_at: now,
            modified_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_value_accepts_only_unit_values() {
        assert_eq!(VoteValue::try_from(1), Ok(VoteValue::Up));
        assert_eq!(VoteValue::try_from(-1), Ok(VoteValue::Down));
        for raw in [0, 2, -2, i64::MAX, i64::MIN] {
            assert_eq!(VoteValue::try_from(raw), Err(InvalidVoteValue(raw)));
        }
        let err: Box<dyn std::error::Error> = Box::new(InvalidVoteValue(3));
        assert_eq!(err.to_string(), "invalid vote value: 3");
    }

    #[test]
    fn test_new_vote_uses_single_timestamp() {
        let now = Utc::now();
        let vote = NewVote::new("user".into(), "caption".into(), VoteValue::Down, now);
        assert_eq!(vote.created_at, vote.modified_at);
        assert_eq!(vote.vote_value.as_i16(), -1);
    }
}
