//! # Redis
//!
//! Document database for cakes, users and orders.
//!
//! ## Requirements
//!
//! - Lookups by id on every request
//! - Small catalog (tens of cakes), modest user and order counts
//! - Unique emails
//!
//! ## Implementation
//!
//! - Redis hash per collection: `cakes`, `users`, `orders`, id -> JSON
//! - Redis hash `users:email`, email -> user id, written with `HSETNX`
//! - Listing reads the whole hash with `HVALS`; filtering and sorting happen
//!   in the handler
//! - Edits run a Lua compare-and-swap, so the hash field is only rewritten
//!   while it still holds the JSON the edit started from
use async_trait::async_trait;
use std::sync::LazyLock;

use redis::{
    AsyncCommands, Client, Script,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::info;

use crate::store::{Collection, DocumentStore, StoreError, UniqueIndex};

// KEYS[1] = collection hash, ARGV = id, expected JSON, new JSON
static COMPARE_AND_SWAP: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        if redis.call('HGET', KEYS[1], ARGV[1]) == ARGV[2] then
            redis.call('HSET', KEYS[1], ARGV[1], ARGV[3])
            return 1
        end
        return 0
        ",
    )
});

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, StoreError> {
    let config = ConnectionManagerConfig::new().set_number_of_retries(1);

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    info!("Connected to Redis at {redis_url}");
    Ok(connection_manager)
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(init_redis(redis_url).await?))
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection.clone();
        Ok(connection.hget(collection.key(), id).await?)
    }

    async fn put(
        &self,
        collection: Collection,
        id: &str,
        document: String,
    ) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: () = connection.hset(collection.key(), id, document).await?;
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        collection: Collection,
        id: &str,
        expected: &str,
        document: String,
    ) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let swapped: i64 = COMPARE_AND_SWAP
            .key(collection.key())
            .arg(id)
            .arg(expected)
            .arg(document)
            .invoke_async(&mut connection)
            .await?;
        Ok(swapped == 1)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let removed: usize = connection.hdel(collection.key(), id).await?;
        Ok(removed > 0)
    }

    async fn all(&self, collection: Collection) -> Result<Vec<String>, StoreError> {
        let mut connection = self.connection.clone();
        Ok(connection.hvals(collection.key()).await?)
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: () = connection.del(collection.key()).await?;
        Ok(())
    }

    async fn claim(&self, index: UniqueIndex, key: &str, id: &str) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        Ok(connection.hset_nx(index.key(), key, id).await?)
    }

    async fn lookup(&self, index: UniqueIndex, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection.clone();
        Ok(connection.hget(index.key(), key).await?)
    }

    async fn release(&self, index: UniqueIndex, key: &str) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: () = connection.hdel(index.key(), key).await?;
        Ok(())
    }

    async fn clear_index(&self, index: UniqueIndex) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: () = connection.del(index.key()).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut connection).await?;
        Ok(())
    }
}
