//! Vote intake: validates and admits a single vote.
//!
//! A vote is admitted at most once per (user, image). The caption lookup and
//! the sibling-vote check only spare a doomed insert; the store's uniqueness
//! constraint is what actually rejects a racing duplicate, and that rejection
//! is reported exactly like a pre-check hit.
use std::sync::Arc;

use caption_votes_repository::{VoteStore, VoteStoreError};
use caption_votes_shared::types::{NewVote, UserId, Vote, VoteValue};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::errors::{ValidationError, VoteError};

/// `VoteIntakeService` admits votes into a `VoteStore`.
pub struct VoteIntakeService {
    store: Arc<dyn VoteStore>,
    clock: Arc<dyn Clock>,
}

impl VoteIntakeService {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn VoteStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Submits one vote for `profile_id`.
    ///
    /// # Arguments
    ///
    /// * `profile_id` - Authenticated user; blank means no session
    /// * `caption_id` - Caption being rated; must not be empty
    /// * `vote_value` - Raw value, must be exactly `1` or `-1`
    ///
    /// # Returns
    ///
    /// * `Ok(Vote)` - The inserted vote
    /// * `Err(VoteError)` - `Validation` errors are raised before the store is touched
    pub async fn submit_vote(
        &self,
        profile_id: &UserId,
        caption_id: &str,
        vote_value: i64,
    ) -> Result<Vote, VoteError> {
        if profile_id.trim().is_empty() {
            return Err(VoteError::Unauthorized);
        }
        if caption_id.is_empty() {
            return Err(ValidationError::CaptionIdRequired.into());
        }
        let vote_value =
            VoteValue::try_from(vote_value).map_err(|_| ValidationError::InvalidVoteValue)?;
        let caption_id = caption_id.to_string();

        let caption = self
            .store
            .find_caption(&caption_id)
            .await
            .map_err(VoteError::store_failure)?
            .ok_or(VoteError::CaptionNotFound)?;

        let sibling_ids = self
            .store
            .caption_ids_for_image(&caption.image_id)
            .await
            .map_err(VoteError::store_failure)?;

        let existing = self
            .store
            .find_votes_by_user(profile_id, &sibling_ids)
            .await
            .map_err(VoteError::store_failure)?;
        if !existing.is_empty() {
            debug!(
                profile_id = %profile_id,
                image_id = %caption.image_id,
                "Vote rejected: image already voted on"
            );
            return Err(VoteError::AlreadyVoted);
        }

        let new_vote = NewVote::new(profile_id.clone(), caption_id, vote_value, self.clock.now());
        match self.store.insert_vote(&new_vote).await {
            Ok(vote) => {
                info!(
                    profile_id = %vote.profile_id,
                    caption_id = %vote.caption_id,
                    image_id = %caption.image_id,
                    vote_value = vote.vote_value.as_i16(),
                    "Vote admitted"
                );
                Ok(vote)
            }
            Err(VoteStoreError::UniqueViolation { constraint }) => {
                warn!(
                    profile_id = %new_vote.profile_id,
                    image_id = %caption.image_id,
                    constraint = %constraint,
                    "Concurrent duplicate vote rejected by store"
                );
                Err(VoteError::AlreadyVoted)
            }
            Err(err) => Err(VoteError::store_failure(err)),
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::clock::FixedClock;
    use async_trait::async_trait;
    use caption_votes_repository::InMemoryVoteStore;
    use caption_votes_shared::types::{Caption, CaptionId, CaptionWithImage, Image, ImageId};
    use chrono::{TimeZone, Utc};

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

    fn caption(id: &str, image_id: &str) -> Caption {
        Caption {
            id: id.to_string(),
            image_id: image_id.to_string(),
            content: Some(format!("caption {id}")),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    /// Image m1 has captions c1 and c2; image m2 has caption c3.
    async fn seeded_store() -> Arc<InMemoryVoteStore> {
        let store = InMemoryVoteStore::new();
        store.insert_image(image("m1")).await;
        store.insert_image(image("m2")).await;
        store.insert_caption(caption("c1", "m1")).await.unwrap();
        store.insert_caption(caption("c2", "m1")).await.unwrap();
        store.insert_caption(caption("c3", "m2")).await.unwrap();
        Arc::new(store)
    }

    fn user(id: &str) -> UserId {
        id.to_string()
    }

    /// Counts every store call and fails all of them.
    #[derive(Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    impl BrokenStore {
        fn fail<T>(&self) -> Result<T, VoteStoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(VoteStoreError::DatabaseError(sqlx::Error::PoolTimedOut))
        }
    }

    #[async_trait]
    impl VoteStore for BrokenStore {
        async fn find_caption(&self, _: &CaptionId) -> Result<Option<Caption>, VoteStoreError> {
            self.fail()
        }
        async fn caption_ids_for_image(&self, _: &ImageId) -> Result<Vec<CaptionId>, VoteStoreError> {
            self.fail()
        }
        async fn find_votes_by_user(
            &self,
            _: &UserId,
            _: &[CaptionId],
        ) -> Result<Vec<Vote>, VoteStoreError> {
            self.fail()
        }
        async fn list_votes_by_user(&self, _: &UserId) -> Result<Vec<Vote>, VoteStoreError> {
            self.fail()
        }
        async fn find_captions(&self, _: &[CaptionId]) -> Result<Vec<Caption>, VoteStoreError> {
            self.fail()
        }
        async fn list_captions_with_images(&self) -> Result<Vec<CaptionWithImage>, VoteStoreError> {
            self.fail()
        }
        async fn insert_vote(&self, _: &NewVote) -> Result<Vote, VoteStoreError> {
            self.fail()
        }
    }

    /// Hides existing votes from the pre-check, as if a concurrent request
    /// inserted between the check and the insert.
    struct BlindPrecheckStore(Arc<InMemoryVoteStore>);

    #[async_trait]
    impl VoteStore for BlindPrecheckStore {
        async fn find_caption(&self, id: &CaptionId) -> Result<Option<Caption>, VoteStoreError> {
            self.0.find_caption(id).await
        }
        async fn caption_ids_for_image(&self, id: &ImageId) -> Result<Vec<CaptionId>, VoteStoreError> {
            self.0.caption_ids_for_image(id).await
        }
        async fn find_votes_by_user(
            &self,
            _: &UserId,
            _: &[CaptionId],
        ) -> Result<Vec<Vote>, VoteStoreError> {
            Ok(Vec::new())
        }
        async fn list_votes_by_user(&self, id: &UserId) -> Result<Vec<Vote>, VoteStoreError> {
            self.0.list_votes_by_user(id).await
        }
        async fn find_captions(&self, ids: &[CaptionId]) -> Result<Vec<Caption>, VoteStoreError> {
            self.0.find_captions(ids).await
        }
        async fn list_captions_with_images(&self) -> Result<Vec<CaptionWithImage>, VoteStoreError> {
            self.0.list_captions_with_images().await
        }
        async fn insert_vote(&self, vote: &NewVote) -> Result<Vote, VoteStoreError> {
            self.0.insert_vote(vote).await
        }
    }

    #[tokio::test]
    async fn test_vote_then_sibling_vote_conflicts() {
        let store = seeded_store().await;
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let service = VoteIntakeService::with_clock(store.clone(), Arc::new(FixedClock(now)));

        let vote = service.submit_vote(&user("u1"), "c1", 1).await.unwrap();
        assert_eq!(vote.caption_id, "c1");
        assert_eq!(vote.vote_value, VoteValue::Up);
        assert_eq!(vote.created_at, now);
        assert_eq!(vote.modified_at, now);

        let err = service.submit_vote(&user("u1"), "c2", -1).await.unwrap_err();
        assert_eq!(err, VoteError::AlreadyVoted);
        assert_eq!(err.status_code(), 409);
        assert_eq!(store.vote_count().await, 1);
    }

    #[tokio::test]
    async fn test_same_caption_twice_conflicts() {
        let store = seeded_store().await;
        let service = VoteIntakeService::new(store.clone());

        service.submit_vote(&user("u1"), "c3", -1).await.unwrap();
        assert_eq!(
            service.submit_vote(&user("u1"), "c3", -1).await,
            Err(VoteError::AlreadyVoted)
        );
    }

    #[tokio::test]
    async fn test_other_users_and_images_are_independent() {
        let store = seeded_store().await;
        let service = VoteIntakeService::new(store.clone());

        service.submit_vote(&user("u1"), "c1", 1).await.unwrap();
        service.submit_vote(&user("u2"), "c2", -1).await.unwrap();
        service.submit_vote(&user("u1"), "c3", 1).await.unwrap();
        assert_eq!(store.vote_count().await, 3);
    }

    #[tokio::test]
    async fn test_missing_caption_is_not_found() {
        let service = VoteIntakeService::new(seeded_store().await);
        assert_eq!(
            service.submit_vote(&user("u1"), "nope", 1).await,
            Err(VoteError::CaptionNotFound)
        );
    }

    #[tokio::test]
    async fn test_whitespace_caption_id_is_looked_up() {
        let service = VoteIntakeService::new(seeded_store().await);
        let result = service.submit_vote(&user("u1"), "   ", 1).await;
        assert_eq!(result, Err(VoteError::CaptionNotFound));
        assert_eq!(result.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn test_validation_happens_before_store_access() {
        let store = Arc::new(BrokenStore::default());
        let service = VoteIntakeService::new(store.clone());

        for raw in [0, 2, -2, 100] {
            assert_eq!(
                service.submit_vote(&user("u1"), "c1", raw).await,
                Err(VoteError::Validation(ValidationError::InvalidVoteValue))
            );
        }
        assert_eq!(
            service.submit_vote(&user("u1"), "", 1).await,
            Err(VoteError::Validation(ValidationError::CaptionIdRequired))
        );
        assert_eq!(
            service.submit_vote(&user("  "), "c1", 1).await,
            Err(VoteError::Unauthorized)
        );
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error_with_message() {
        let service = VoteIntakeService::new(Arc::new(BrokenStore::default()));
        let err = service.submit_vote(&user("u1"), "c1", 1).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("pool timed out"), "{err}");
    }

    #[tokio::test]
    async fn test_race_past_precheck_is_reported_as_conflict() {
        let inner = seeded_store().await;
        let service = VoteIntakeService::new(Arc::new(BlindPrecheckStore(inner.clone())));

        service.submit_vote(&user("u1"), "c1", 1).await.unwrap();
        assert_eq!(
            service.submit_vote(&user("u1"), "c2", 1).await,
            Err(VoteError::AlreadyVoted)
        );
        assert_eq!(inner.vote_count().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_votes_on_one_image_admit_exactly_one() {
        let store = seeded_store().await;
        let service = Arc::new(VoteIntakeService::new(store.clone()));

        let attempts = (0..16).map(|i| {
            let service = service.clone();
            let caption_id = if i % 2 == 0 { "c1" } else { "c2" };
            let value = if i % 3 == 0 { -1 } else { 1 };
            tokio::spawn(async move { service.submit_vote(&user("u1"), caption_id, value).await })
        });
        let results = futures::future::join_all(attempts).await;

        let mut admitted = 0;
        for result in results {
            match result.unwrap() {
                Ok(_) => admitted += 1,
                Err(err) => assert_eq!(err, VoteError::AlreadyVoted),
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(store.vote_count().await, 1);
    }
}
