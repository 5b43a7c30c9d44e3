//! Eligibility filter: which captions a user may still vote on, in random order.
use std::collections::HashSet;
use std::sync::Arc;

use caption_votes_repository::VoteStore;
use caption_votes_shared::types::{
    is_present, CaptionId, CaptionWithImage, ImageId, QueueItem, UserId,
};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::errors::VoteError;

/// Returns true when a caption can be shown to a user who has already voted
/// on `voted_images`: it has text, its image has a URL, and that image is
/// not yet voted on.
pub fn is_eligible(row: &CaptionWithImage, voted_images: &HashSet<ImageId>) -> bool {
    row.caption.has_text()
        && is_present(row.image.url.as_deref())
        && !voted_images.contains(&row.image.id)
}

/// `EligibilityFilter` builds the voting queue for a user.
///
/// It only reads from the store, so repeated calls are safe.
pub struct EligibilityFilter {
    store: Arc<dyn VoteStore>,
}

impl EligibilityFilter {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }

    /// Loads every eligible caption for `profile_id`, uniformly shuffled.
    pub async fn load_eligible_queue(
        &self,
        profile_id: &UserId,
    ) -> Result<Vec<QueueItem>, VoteError> {
        let mut items = self.load_eligible_items(profile_id).await?;
        items.shuffle(&mut rand::thread_rng());
        Ok(items)
    }

    /// Same as [`load_eligible_queue`](Self::load_eligible_queue) with a caller-supplied RNG.
    pub async fn load_eligible_queue_with_rng<R: Rng + Send + ?Sized>(
        &self,
        profile_id: &UserId,
        rng: &mut R,
    ) -> Result<Vec<QueueItem>, VoteError> {
        let mut items = self.load_eligible_items(profile_id).await?;
        items.shuffle(rng);
        Ok(items)
    }

    /// Eligible items in store order (newest caption first).
    async fn load_eligible_items(&self, profile_id: &UserId) -> Result<Vec<QueueItem>, VoteError> {
        if profile_id.trim().is_empty() {
            return Err(VoteError::Unauthorized);
        }

        let voted_images = self.voted_image_ids(profile_id).await?;
        let rows = self
            .store
            .list_captions_with_images()
            .await
            .map_err(VoteError::store_failure)?;
        let total = rows.len();

        let items: Vec<QueueItem> = rows
            .into_iter()
            .filter(|row| is_eligible(row, &voted_images))
            .map(QueueItem::from)
            .collect();

        debug!(
            profile_id = %profile_id,
            candidates = total,
            voted_images = voted_images.len(),
            eligible = items.len(),
            "Computed eligible queue"
        );
        Ok(items)
    }

    async fn voted_image_ids(&self, profile_id: &UserId) -> Result<HashSet<ImageId>, VoteError> {
        let votes = self
            .store
            .list_votes_by_user(profile_id)
            .await
            .map_err(VoteError::store_failure)?;
        if votes.is_empty() {
            return Ok(HashSet::new());
        }

        let caption_ids: Vec<CaptionId> = votes.into_iter().map(|v| v.caption_id).collect();
        let captions = self
            .store
            .find_captions(&caption_ids)
            .await
            .map_err(VoteError::store_failure)?;
        Ok(captions.into_iter().map(|c| c.image_id).collect())
    }
}
