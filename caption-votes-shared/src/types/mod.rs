mod caption;
mod image;
mod queue_item;
mod vote;
mod wire;

pub use caption::{Caption, CaptionWithImage};
pub use image::Image;
pub use queue_item::QueueItem;
pub use vote::{InvalidVoteValue, NewVote, Vote, VoteValue};
pub use wire::{ErrorBody, SubmitVoteRequest, VoteAck};

/// Opaque user identifier issued by the external identity provider.
pub type UserId = String;
pub type CaptionId = String;
pub type ImageId = String;
pub type VoteId = uuid::Uuid;

/// Returns true when the optional text is present and not blank after trimming.
pub fn is_present(text: Option<&str>) -> bool {
    text.is_some_and(|t| !t.trim().is_empty())
}
