//! # Document Store
//!
//! Storage seam between the handlers and the database.
//!
//! ## Layout
//!
//! - One hash per collection: document id -> JSON document
//! - One hash per unique index: key -> document id
//!
//! Unique keys are claimed with a set-if-absent, so two signups racing on the
//! same email cannot both win. Everything else is plain get/put/delete on a
//! single document, which the database serializes for us.
//!
//! Edits of existing documents go through a compare-and-swap on the exact JSON
//! that was read, so an edit never resurrects a deleted document nor clobbers a
//! write that landed in between.
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt {collection} document {id}: {source}")]
    Corrupt {
        collection: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("{collection} document {id} kept changing under concurrent writes")]
    Conflict {
        collection: &'static str,
        id: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Cakes,
    Users,
    Orders,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Collection::Cakes => "cakes",
            Collection::Users => "users",
            Collection::Orders => "orders",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniqueIndex {
    UserEmail,
}

impl UniqueIndex {
    pub fn key(self) -> &'static str {
        match self {
            UniqueIndex::UserEmail => "users:email",
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<String>, StoreError>;

    async fn put(&self, collection: Collection, id: &str, document: String)
    -> Result<(), StoreError>;

    /// Replaces the document only if it still reads exactly `expected`.
    /// Returns whether it was written; a missing document is never written.
    async fn compare_and_swap(
        &self,
        collection: Collection,
        id: &str,
        expected: &str,
        document: String,
    ) -> Result<bool, StoreError>;

    /// Returns whether a document was removed.
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError>;

    async fn all(&self, collection: Collection) -> Result<Vec<String>, StoreError>;

    async fn clear(&self, collection: Collection) -> Result<(), StoreError>;

    /// Binds `key` to `id` unless the key is taken. Returns whether it was bound.
    async fn claim(&self, index: UniqueIndex, key: &str, id: &str) -> Result<bool, StoreError>;

    async fn lookup(&self, index: UniqueIndex, key: &str) -> Result<Option<String>, StoreError>;

    async fn release(&self, index: UniqueIndex, key: &str) -> Result<(), StoreError>;

    async fn clear_index(&self, index: UniqueIndex) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
