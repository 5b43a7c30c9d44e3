//! This module defines the `VoteStore` trait, the generic read/insert interface
//! over the images, captions and caption votes relations.
use async_trait::async_trait;
use caption_votes_shared::types::{
    Caption, CaptionId, CaptionWithImage, ImageId, NewVote, UserId, Vote,
};

use crate::errors::VoteStoreError;

/// A trait that defines the interface for interacting with the vote store.
///
/// Implementors must enforce uniqueness of votes per (profile, caption) and
/// per (profile, image) at insert time and report a violation as
/// `VoteStoreError::UniqueViolation`. That guard is what keeps concurrent
/// submissions from producing a second vote; callers may pre-check with the
/// read methods but must not rely on it.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Looks up a single caption by identifier.
    async fn find_caption(
        &self,
        caption_id: &CaptionId,
    ) -> Result<Option<Caption>, VoteStoreError>;

    /// Lists the identifiers of every caption belonging to an image.
    async fn caption_ids_for_image(
        &self,
        image_id: &ImageId,
    ) -> Result<Vec<CaptionId>, VoteStoreError>;

    /// Returns the votes a user has cast on any of the given captions.
    ///
    /// An empty `caption_ids` slice yields an empty result without a round-trip.
    async fn find_votes_by_user(
        &self,
        profile_id: &UserId,
        caption_ids: &[CaptionId],
    ) -> Result<Vec<Vote>, VoteStoreError>;

    /// Returns every vote a user has cast.
    async fn list_votes_by_user(&self, profile_id: &UserId) -> Result<Vec<Vote>, VoteStoreError>;

    /// Looks up several captions at once. Unknown identifiers are ignored.
    async fn find_captions(
        &self,
        caption_ids: &[CaptionId],
    ) -> Result<Vec<Caption>, VoteStoreError>;

    /// Lists captions with non-null content joined with their image, newest first.
    async fn list_captions_with_images(&self) -> Result<Vec<CaptionWithImage>, VoteStoreError>;

    /// Inserts a vote and returns the stored record.
    async fn insert_vote(&self, vote: &NewVote) -> Result<Vote, VoteStoreError>;
}
