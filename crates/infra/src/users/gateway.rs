use std::sync::Arc;

use thiserror::Error;

use userbase_core::{User, UserId, UserProfile};

/// Store operation error.
///
/// A missing row is *not* an error: lookups report it as `Ok(None)`. Every
/// variant here is a failure of the store itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached (pool closed, connection lost, timeout).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The database rejected or failed the statement.
    #[error("query failed: {0}")]
    Query(String),

    /// A returned row could not be read into a `User`.
    #[error("row decode failed: {0}")]
    Decode(String),
}

/// Persistence operations for user records.
///
/// Each call is an independent, auto-committed unit of work. Implementations
/// do no caching and no retries.
#[async_trait::async_trait]
pub trait UserGateway: Send + Sync {
    /// Insert a new record and return the identifier the store assigned.
    async fn insert(&self, profile: &UserProfile) -> Result<UserId, StoreError>;

    /// Load one record. `Ok(None)` means no row has that id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Replace every non-id field of a record. Returns the number of rows
    /// matched (0 or 1).
    async fn replace_by_id(&self, id: UserId, profile: &UserProfile) -> Result<u64, StoreError>;

    /// Delete a record. Returns the number of rows removed (0 or 1).
    async fn delete_by_id(&self, id: UserId) -> Result<u64, StoreError>;

    /// Every record, in the store's scan order.
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;
}

#[async_trait::async_trait]
impl<G> UserGateway for Arc<G>
where
    G: UserGateway + ?Sized,
{
    async fn insert(&self, profile: &UserProfile) -> Result<UserId, StoreError> {
        (**self).insert(profile).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn replace_by_id(&self, id: UserId, profile: &UserProfile) -> Result<u64, StoreError> {
        (**self).replace_by_id(id, profile).await
    }

    async fn delete_by_id(&self, id: UserId) -> Result<u64, StoreError> {
        (**self).delete_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        (**self).find_all().await
    }
}
