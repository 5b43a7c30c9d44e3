use std::sync::Arc;

use caption_votes_repository::{InMemoryVoteStore, PostgresVoteStore, VoteStore};
use caption_votes_service::{EligibilityFilter, VoteIntakeService};
use caption_votes_shared::types::{Caption, Image};
use serde::Deserialize;
use tracing::info;

use crate::config::{ConfigError, Settings, StoreBackend};
use crate::errors::AppError;
use crate::server::identity::TrustedHeaderIdentity;
use crate::server::state::AppState;

/// Contents of a memory backend seed file.
#[derive(Debug, Default, Deserialize)]
pub struct MemorySeed {
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub captions: Vec<Caption>,
}

/// `Dependencies` holds the wired components the HTTP layer runs on.
pub struct Dependencies {
    pub state: AppState,
}

impl Dependencies {
    /// Creates the store selected by `settings` and wires the services on top of it.
    ///
    /// For PostgreSQL this connects the pool and, unless disabled, applies
    /// pending migrations. The memory backend is optionally seeded from
    /// `MEMORY_SEED_PATH`.
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        let store: Arc<dyn VoteStore> = match settings.store_backend {
            StoreBackend::Postgres => {
                let url = settings
                    .database_url
                    .as_deref()
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?;
                let store =
                    PostgresVoteStore::connect(url, settings.database_max_connections).await?;
                if settings.run_migrations {
                    store.migrate().await?;
                }
                Arc::new(store)
            }
            StoreBackend::Memory => {
                let store = InMemoryVoteStore::new();
                if let Some(path) = &settings.memory_seed_path {
                    let seed = load_seed(path).await?;
                    seed_store(&store, seed).await?;
                }
                Arc::new(store)
            }
        };

        Ok(Self::with_store(store, settings))
    }

    /// Wires the services on top of an already constructed store.
    pub fn with_store(store: Arc<dyn VoteStore>, settings: &Settings) -> Self {
        let state = AppState {
            intake: Arc::new(VoteIntakeService::new(store.clone())),
            eligibility: Arc::new(EligibilityFilter::new(store)),
            identity: Arc::new(TrustedHeaderIdentity::new(settings.user_id_header.clone())),
        };
        Self { state }
    }
}

async fn load_seed(path: &str) -> Result<MemorySeed, AppError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Seed(format!("cannot read {path}: {e}")))?;
    serde_json::from_str(&raw).map_err(|e| AppError::Seed(format!("cannot parse {path}: {e}")))
}

/// Loads images before captions so every caption finds its image.
pub async fn seed_store(store: &InMemoryVoteStore, seed: MemorySeed) -> Result<(), AppError> {
    let (images, captions) = (seed.images.len(), seed.captions.len());
    for image in seed.images {
        store.insert_image(image).await;
    }
    for caption in seed.captions {
        store.insert_caption(caption).await?;
    }
    info!(images, captions, "Seeded in-memory store");
    Ok(())
}
