use std::sync::Arc;

use tracing::info;

use super::{
    auth::TokenKeys,
    config::{Config, StoreBackend},
    database::RedisStore,
    memory::MemoryStore,
    repository::Database,
    store::{DocumentStore, StoreError},
};

pub struct State {
    pub config: Config,
    pub db: Database,
    pub tokens: TokenKeys,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>, StoreError> {
        let store: Arc<dyn DocumentStore> = match config.store {
            StoreBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
            StoreBackend::Memory => {
                info!("Using in-memory store, nothing will be persisted");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Arc<Self> {
        let tokens = TokenKeys::new(&config.jwt_secret, config.token_ttl_hours);

        Arc::new(Self {
            config,
            db: Database::new(store),
            tokens,
        })
    }
}
