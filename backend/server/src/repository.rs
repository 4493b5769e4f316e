use std::sync::Arc;

use domain::{cakes::Cake, orders::Order, users::User};
use serde::{Serialize, de::DeserializeOwned};

use tracing::debug;

use crate::store::{Collection, DocumentStore, StoreError, UniqueIndex};

const MODIFY_ATTEMPTS: usize = 5;

pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

impl Document for Cake {
    const COLLECTION: Collection = Collection::Cakes;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Order {
    const COLLECTION: Collection = Collection::Orders;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Typed access over whichever [`DocumentStore`] the server was started with.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
}

impl Database {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find<T: Document>(&self, id: &str) -> Result<Option<T>, StoreError> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(|raw| decode::<T>(id, &raw))
            .transpose()
    }

    pub async fn find_all<T: Document>(&self) -> Result<Vec<T>, StoreError> {
        self.store
            .all(T::COLLECTION)
            .await?
            .iter()
            .map(|raw| decode::<T>("<listing>", raw))
            .collect()
    }

    pub async fn save<T: Document>(&self, document: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(document).map_err(StoreError::Encode)?;
        self.store.put(T::COLLECTION, document.id(), raw).await
    }

    /// Applies `change` to the stored document and writes it back only if
    /// nothing else wrote in between, retrying on the fresh copy otherwise.
    /// `Ok(None)` means the document does not exist (anymore).
    pub async fn modify<T, E, F>(&self, id: &str, mut change: F) -> Result<Option<T>, E>
    where
        T: Document,
        E: From<StoreError>,
        F: FnMut(T) -> Result<T, E>,
    {
        for attempt in 1..=MODIFY_ATTEMPTS {
            let Some(raw) = self.store.get(T::COLLECTION, id).await? else {
                return Ok(None);
            };

            let updated = change(decode::<T>(id, &raw)?)?;
            let encoded = serde_json::to_string(&updated).map_err(StoreError::Encode)?;

            if self
                .store
                .compare_and_swap(T::COLLECTION, id, &raw, encoded)
                .await?
            {
                return Ok(Some(updated));
            }

            debug!(
                "{} document {id} changed during edit, attempt {attempt}",
                T::COLLECTION.key()
            );
        }

        Err(StoreError::Conflict {
            collection: T::COLLECTION.key(),
            id: id.to_string(),
        }
        .into())
    }

    pub async fn remove<T: Document>(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(T::COLLECTION, id).await
    }

    pub async fn clear<T: Document>(&self) -> Result<(), StoreError> {
        self.store.clear(T::COLLECTION).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        match self.store.lookup(UniqueIndex::UserEmail, email).await? {
            Some(id) => self.find(&id).await,
            None => Ok(None),
        }
    }

    /// Stores a new user if the email is free. Returns `false` when taken.
    pub async fn insert_user(&self, user: &User) -> Result<bool, StoreError> {
        if !self
            .store
            .claim(UniqueIndex::UserEmail, &user.email, &user.id)
            .await?
        {
            return Ok(false);
        }

        if let Err(e) = self.save(user).await {
            self.store.release(UniqueIndex::UserEmail, &user.email).await?;
            return Err(e);
        }

        Ok(true)
    }

    pub async fn remove_user(&self, user: &User) -> Result<bool, StoreError> {
        let removed = self.remove::<User>(&user.id).await?;
        self.store.release(UniqueIndex::UserEmail, &user.email).await?;
        Ok(removed)
    }

    pub async fn clear_users(&self) -> Result<(), StoreError> {
        self.clear::<User>().await?;
        self.store.clear_index(UniqueIndex::UserEmail).await
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}

fn decode<T: Document>(id: &str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Corrupt {
        collection: T::COLLECTION.key(),
        id: id.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use domain::users::{Role, User};

    use super::*;
    use crate::memory::MemoryStore;

    fn user(id: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: id.into(),
            name: "Ada".into(),
            email: email.into(),
            password_hash: String::new(),
            role: Role::User,
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn database() -> Database {
        Database::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_modify_applies_to_stored_copy() {
        let db = database();
        let stale = user("u1", "ada@example.com");
        db.insert_user(&stale).await.unwrap();

        db.modify::<User, StoreError, _>("u1", |mut u| {
            u.role = Role::Admin;
            Ok(u)
        })
        .await
        .unwrap();

        // Editing from an old copy keeps the role change made meanwhile.
        let renamed = db
            .modify::<User, StoreError, _>(&stale.id, |mut u| {
                u.name = "Ada L.".into();
                Ok(u)
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(renamed.name, "Ada L.");
        assert_eq!(renamed.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_modify_does_not_resurrect() {
        let db = database();
        let loaded = user("u1", "ada@example.com");
        db.insert_user(&loaded).await.unwrap();

        db.remove_user(&loaded).await.unwrap();

        let edited = db
            .modify::<User, StoreError, _>(&loaded.id, |mut u| {
                u.name = "Renamed".into();
                Ok(u)
            })
            .await
            .unwrap();

        assert!(edited.is_none());
        assert!(db.find::<User>("u1").await.unwrap().is_none());
        assert!(db.insert_user(&user("u2", "ada@example.com")).await.unwrap());
        assert_eq!(db.find_all::<User>().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_modify_error_leaves_document() {
        let db = database();
        db.insert_user(&user("u1", "ada@example.com")).await.unwrap();

        let result = db
            .modify::<User, StoreError, _>("u1", |_| {
                Err(StoreError::Conflict {
                    collection: "users",
                    id: "u1".into(),
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(db.find::<User>("u1").await.unwrap().unwrap().name, "Ada");
    }
}
