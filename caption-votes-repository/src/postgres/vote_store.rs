//! PostgreSQL implementation of the vote store.
//!
//! ## Database Tables
//!
//! - `images`: pictures being captioned (read-only here)
//! - `captions`: candidate captions, many per image (read-only here)
//! - `caption_votes`: one row per vote, unique per (profile, caption) and per
//!   (profile, image)
use async_trait::async_trait;
use caption_votes_shared::types::{
    Caption, CaptionId, CaptionWithImage, Image, ImageId, NewVote, UserId, Vote, VoteValue,
};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{VoteStore, VoteStoreError};

#[derive(sqlx::FromRow)]
struct CaptionRow {
    id: String,
    image_id: String,
    content: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CaptionRow> for Caption {
    fn from(row: CaptionRow) -> Self {
        Caption {
            id: row.id,
            image_id: row.image_id,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    id: Uuid,
    caption_id: String,
    profile_id: String,
    vote_value: i16,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = VoteStoreError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        let vote_value = match row.vote_value {
            1 => VoteValue::Up,
            -1 => VoteValue::Down,
            other => return Err(VoteStoreError::InvalidVoteValue(other)),
        };
        Ok(Vote {
            id: row.id,
            caption_id: row.caption_id,
            profile_id: row.profile_id,
            vote_value,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CaptionImageRow {
    caption_id: String,
    content: Option<String>,
    caption_created_at: DateTime<Utc>,
    image_id: String,
    url: Option<String>,
    image_description: Option<String>,
    additional_context: Option<String>,
    is_public: bool,
    image_created_at: DateTime<Utc>,
}

impl From<CaptionImageRow> for CaptionWithImage {
    fn from(row: CaptionImageRow) -> Self {
        CaptionWithImage {
            caption: Caption {
                id: row.caption_id,
                image_id: row.image_id.clone(),
                content: row.content,
                created_at: row.caption_created_at,
            },
            image: Image {
                id: row.image_id,
                url: row.url,
                image_description: row.image_description,
                additional_context: row.additional_context,
                is_public: row.is_public,
                created_at: row.image_created_at,
            },
        }
    }
}

const VOTE_COLUMNS: &str = "id, caption_id, profile_id, vote_value, \
    created_datetime_utc AS created_at, modified_datetime_utc AS modified_at";

fn collect_votes(rows: Vec<VoteRow>) -> Result<Vec<Vote>, VoteStoreError> {
    rows.into_iter().map(Vote::try_from).collect()
}

/// PostgreSQL-backed vote store.
///
/// Reads go straight to the pool; the single write relies on the
/// `caption_votes` unique constraints rather than on a transaction-level
/// pre-check, so two racing inserts resolve to one row and one
/// `VoteStoreError::UniqueViolation`.
pub struct PostgresVoteStore {
    pool: sqlx::PgPool,
}

impl PostgresVoteStore {
    /// Creates a new store over an existing pool.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the required schema
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, VoteStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        debug!(max_connections, "Connected PostgreSQL pool");
        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), VoteStoreError> {
        let migrator = sqlx::migrate!("src/postgres/migrations");
        migrator.run(&self.pool).await?;
        info!(migrations = migrator.iter().count(), "Schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl VoteStore for PostgresVoteStore {
    async fn find_caption(
        &self,
        caption_id: &CaptionId,
    ) -> Result<Option<Caption>, VoteStoreError> {
        let row = sqlx::query_as::<_, CaptionRow>(
            r#"
            SELECT id, image_id, content, created_datetime_utc AS created_at
            FROM captions
            WHERE id = $1
            "#,
        )
        .bind(caption_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Caption::from))
    }

    async fn caption_ids_for_image(
        &self,
        image_id: &ImageId,
    ) -> Result<Vec<CaptionId>, VoteStoreError> {
        let ids = sqlx::query_scalar::<_, String>("SELECT id FROM captions WHERE image_id = $1")
            .bind(image_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn find_votes_by_user(
        &self,
        profile_id: &UserId,
        caption_ids: &[CaptionId],
    ) -> Result<Vec<Vote>, VoteStoreError> {
        if caption_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, VoteRow>(&format!(
            "SELECT {VOTE_COLUMNS} FROM caption_votes WHERE profile_id = $1 AND caption_id = ANY($2)"
        ))
        .bind(profile_id)
        .bind(caption_ids)
        .fetch_all(&self.pool)
        .await?;

        collect_votes(rows)
    }

    async fn list_votes_by_user(&self, profile_id: &UserId) -> Result<Vec<Vote>, VoteStoreError> {
        let rows = sqlx::query_as::<_, VoteRow>(&format!(
            "SELECT {VOTE_COLUMNS} FROM caption_votes WHERE profile_id = $1"
        ))
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        collect_votes(rows)
    }

    async fn find_captions(
        &self,
        caption_ids: &[CaptionId],
    ) -> Result<Vec<Caption>, VoteStoreError> {
        if caption_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, CaptionRow>(
            r#"
            SELECT id, image_id, content, created_datetime_utc AS created_at
            FROM captions
            WHERE id = ANY($1)
            "#,
        )
        .bind(caption_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Caption::from).collect())
    }

    async fn list_captions_with_images(&self) -> Result<Vec<CaptionWithImage>, VoteStoreError> {
        let rows = sqlx::query_as::<_, CaptionImageRow>(
            r#"
            SELECT
                c.id AS caption_id,
                c.content,
                c.created_datetime_utc AS caption_created_at,
                i.id AS image_id,
                i.url,
                i.image_description,
                i.additional_context,
                i.is_public,
                i.created_datetime_utc AS image_created_at
            FROM captions c
            JOIN images i ON i.id = c.image_id
            WHERE c.content IS NOT NULL AND c.content <> ''
            ORDER BY c.created_datetime_utc DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CaptionWithImage::from).collect())
    }

    async fn insert_vote(&self, vote: &NewVote) -> Result<Vote, VoteStoreError> {
        // The image id is resolved inside the statement so it always matches the caption.
        let row = sqlx::query_as::<_, VoteRow>(&format!(
            r#"
            INSERT INTO caption_votes
                (id, caption_id, profile_id, image_id, vote_value, created_datetime_utc, modified_datetime_utc)
            SELECT $1, c.id, $2, c.image_id, $3, $4, $5
            FROM captions c
            WHERE c.id = $6
            RETURNING {VOTE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&vote.profile_id)
        .bind(vote.vote_value.as_i16())
        .bind(vote.created_at)
        .bind(vote.modified_at)
        .bind(&vote.caption_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Vote::try_from(row),
            None => Err(VoteStoreError::MissingCaption(vote.caption_id.clone())),
        }
    }
}
