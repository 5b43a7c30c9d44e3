//! In-memory implementation of the vote store.
//!
//! Mirrors the PostgreSQL schema closely enough to stand in for it in tests
//! and in the server's development mode, including both uniqueness keys of
//! `caption_votes`.
use std::collections::HashMap;

use async_trait::async_trait;
use caption_votes_shared::types::{
    Caption, CaptionId, CaptionWithImage, Image, ImageId, NewVote, UserId, Vote,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{VoteStore, VoteStoreError};

pub const PROFILE_CAPTION_KEY: &str = "caption_votes_profile_caption_key";
pub const PROFILE_IMAGE_KEY: &str = "caption_votes_profile_image_key";

#[derive(Default)]
struct Tables {
    images: HashMap<ImageId, Image>,
    captions: Vec<Caption>,
    votes: Vec<StoredVote>,
}

struct StoredVote {
    image_id: ImageId,
    vote: Vote,
}

/// Vote store held entirely in process memory.
#[derive(Default)]
pub struct InMemoryVoteStore {
    tables: RwLock<Tables>,
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an image.
    pub async fn insert_image(&self, image: Image) {
        let mut tables = self.tables.write().await;
        tables.images.insert(image.id.clone(), image);
    }

    /// Adds a caption. Captions referencing an unknown image are rejected,
    /// like the foreign key on `captions.image_id`.
    pub async fn insert_caption(&self, caption: Caption) -> Result<(), VoteStoreError> {
        let mut tables = self.tables.write().await;
        if !tables.images.contains_key(&caption.image_id) {
            return Err(VoteStoreError::MissingImage(caption.image_id));
        }
        tables.captions.retain(|c| c.id != caption.id);
        tables.captions.push(caption);
        Ok(())
    }

    /// Number of stored votes, for assertions.
    pub async fn vote_count(&self) -> usize {
        self.tables.read().await.votes.len()
    }
}

#[async_trait]
impl VoteStore for InMemoryVoteStore {
    async fn find_caption(
        &self,
        caption_id: &CaptionId,
    ) -> Result<Option<Caption>, VoteStoreError> {
        let tables = self.tables.read().await;
        Ok(tables.captions.iter().find(|c| &c.id == caption_id).cloned())
    }

    async fn caption_ids_for_image(
        &self,
        image_id: &ImageId,
    ) -> Result<Vec<CaptionId>, VoteStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .captions
            .iter()
            .filter(|c| &c.image_id == image_id)
            .map(|c| c.id.clone())
            .collect())
    }

    async fn find_votes_by_user(
        &self,
        profile_id: &UserId,
        caption_ids: &[CaptionId],
    ) -> Result<Vec<Vote>, VoteStoreError> {
        if caption_ids.is_empty() {
            return Ok(Vec::new());
        }
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .iter()
            .map(|stored| &stored.vote)
            .filter(|v| &v.profile_id == profile_id && caption_ids.contains(&v.caption_id))
            .cloned()
            .collect())
    }

    async fn list_votes_by_user(&self, profile_id: &UserId) -> Result<Vec<Vote>, VoteStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .iter()
            .map(|stored| &stored.vote)
            .filter(|v| &v.profile_id == profile_id)
            .cloned()
            .collect())
    }

    async fn find_captions(
        &self,
        caption_ids: &[CaptionId],
    ) -> Result<Vec<Caption>, VoteStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .captions
            .iter()
            .filter(|c| caption_ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn list_captions_with_images(&self) -> Result<Vec<CaptionWithImage>, VoteStoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<CaptionWithImage> = tables
            .captions
            .iter()
            .filter(|c| c.content.as_deref().is_some_and(|text| !text.is_empty()))
            .filter_map(|c| {
                tables.images.get(&c.image_id).map(|image| CaptionWithImage {
                    caption: c.clone(),
                    image: image.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.caption.created_at.cmp(&a.caption.created_at));
        Ok(rows)
    }

    async fn insert_vote(&self, vote: &NewVote) -> Result<Vote, VoteStoreError> {
        let mut tables = self.tables.write().await;

        let image_id = tables
            .captions
            .iter()
            .find(|c| c.id == vote.caption_id)
            .map(|c| c.image_id.clone())
            .ok_or_else(|| VoteStoreError::MissingCaption(vote.caption_id.clone()))?;

        for stored in tables.votes.iter().filter(|s| s.vote.profile_id == vote.profile_id) {
            if stored.vote.caption_id == vote.caption_id {
                return Err(VoteStoreError::UniqueViolation {
                    constraint: PROFILE_CAPTION_KEY.to_string(),
                });
            }
            if stored.image_id == image_id {
                return Err(VoteStoreError::UniqueViolation {
                    constraint: PROFILE_IMAGE_KEY.to_string(),
                });
            }
        }

        let stored = Vote {
            id: Uuid::new_v4(),
            caption_id: vote.caption_id.clone(),
            profile_id: vote.profile_id.clone(),
            vote_value: vote.vote_value,
            created_at: vote.created_at,
            modified_at: vote.modified_at,
        };
        tables.votes.push(StoredVote {
            image_id,
            vote: stored.clone(),
        });
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caption_votes_shared::types::VoteValue;
    use chrono::{Duration, TimeZone, Utc};

    fn image(id: &str) -> Image {
        Image {
            id: id.to_string(),
            url: Some(format!("https://img.example/{id}.png")),
            image_description: None,
            additional_context: None,
            is_public: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn caption(id: &str, image_id: &str, content: Option<&str>, minutes: i64) -> Caption {
        Caption {
            id: id.to_string(),
            image_id: image_id.to_string(),
            content: content.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    async fn seeded_store() -> InMemoryVoteStore {
        let store = InMemoryVoteStore::new();
        store.insert_image(image("m1")).await;
        store.insert_image(image("m2")).await;
        store.insert_caption(caption("c1", "m1", Some("one"), 0)).await.unwrap();
        store.insert_caption(caption("c2", "m1", Some("two"), 1)).await.unwrap();
        store.insert_caption(caption("c3", "m2", Some("three"), 2)).await.unwrap();
        store.insert_caption(caption("c4", "m2", None, 3)).await.unwrap();
        store
    }

    fn new_vote(user: &str, caption_id: &str) -> NewVote {
        NewVote::new(user.into(), caption_id.into(), VoteValue::Up, Utc::now())
    }

    #[tokio::test]
    async fn test_insert_caption_requires_image() {
        let store = InMemoryVoteStore::new();
        let err = store
            .insert_caption(caption("c1", "missing", Some("x"), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, VoteStoreError::MissingImage(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_insert_vote_rejects_second_vote_on_same_image() {
        let store = seeded_store().await;
        store.insert_vote(&new_vote("u1", "c1")).await.unwrap();

        let same_caption = store.insert_vote(&new_vote("u1", "c1")).await.unwrap_err();
        assert!(matches!(
            same_caption,
            VoteStoreError::UniqueViolation { ref constraint } if constraint == PROFILE_CAPTION_KEY
        ));

        let sibling = store.insert_vote(&new_vote("u1", "c2")).await.unwrap_err();
        assert!(matches!(
            sibling,
            VoteStoreError::UniqueViolation { ref constraint } if constraint == PROFILE_IMAGE_KEY
        ));

        // Other users and other images are unaffected.
        store.insert_vote(&new_vote("u2", "c2")).await.unwrap();
        store.insert_vote(&new_vote("u1", "c3")).await.unwrap();
        assert_eq!(store.vote_count().await, 3);
    }

    #[tokio::test]
    async fn test_insert_vote_for_unknown_caption() {
        let store = seeded_store().await;
        let err = store.insert_vote(&new_vote("u1", "nope")).await.unwrap_err();
        assert!(matches!(err, VoteStoreError::MissingCaption(id) if id == "nope"));
        assert_eq!(store.vote_count().await, 0);
    }

    #[tokio::test]
    async fn test_find_votes_by_user_restricts_to_caption_set() {
        let store = seeded_store().await;
        store.insert_vote(&new_vote("u1", "c1")).await.unwrap();
        store.insert_vote(&new_vote("u1", "c3")).await.unwrap();

        let ids = store.caption_ids_for_image(&"m1".to_string()).await.unwrap();
        let votes = store.find_votes_by_user(&"u1".to_string(), &ids).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].caption_id, "c1");

        assert!(store.find_votes_by_user(&"u1".to_string(), &[]).await.unwrap().is_empty());
        assert_eq!(store.list_votes_by_user(&"u1".to_string()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_captions_with_images_skips_null_content_newest_first() {
        let store = seeded_store().await;
        let rows = store.list_captions_with_images().await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.caption.id.as_str()).collect();
        assert_eq!(ids, vec!["c3", "c2", "c1"]);
        assert_eq!(rows[0].image.id, "m2");
    }
}
