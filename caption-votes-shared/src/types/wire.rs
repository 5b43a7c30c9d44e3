use serde::{Deserialize, Serialize};

use crate::types::CaptionId;

/// Request body of `POST /api/caption-votes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteRequest {
    pub caption_id: CaptionId,
    pub vote_value: i64,
}

/// Success body: `{ "ok": true }`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteAck {
    pub ok: bool,
}

impl Default for VoteAck {
    fn default() -> Self {
        Self { ok: true }
    }
}

/// Failure body: `{ "error": "<message>" }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
