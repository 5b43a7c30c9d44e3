//! User-visible messages returned by the vote endpoint.
//!
//! The client matches on status codes rather than on these strings, but both
//! sides render them verbatim, so they live in one place.

pub const UNAUTHORIZED: &str = "Unauthorized";
pub const INVALID_JSON_BODY: &str = "Invalid JSON body";
pub const CAPTION_ID_REQUIRED: &str = "captionId is required";
pub const INVALID_VOTE_VALUE: &str = "voteValue must be 1 (upvote) or -1 (downvote)";
pub const CAPTION_NOT_FOUND: &str = "Caption not found";
pub const ALREADY_VOTED: &str = "You have already voted on this image";

/// Shown by the deck when a failed submission carries no usable message.
pub const SUBMIT_FAILED_FALLBACK: &str = "Failed to submit vote";
