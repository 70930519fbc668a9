use std::collections::BTreeMap;
use std::sync::RwLock;

use userbase_core::{User, UserId, UserProfile};

use super::gateway::{StoreError, UserGateway};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<UserId, UserProfile>,
}

/// In-memory user table.
///
/// Intended for tests/dev. Ids are assigned from 1 upwards and never reused,
/// like an auto-increment column.
#[derive(Debug, Default)]
pub struct InMemoryUserGateway {
    table: RwLock<Table>,
}

impl InMemoryUserGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("in-memory user table lock poisoned".to_string())
}

#[async_trait::async_trait]
impl UserGateway for InMemoryUserGateway {
    async fn insert(&self, profile: &UserProfile) -> Result<UserId, StoreError> {
        let mut table = self.table.write().map_err(poisoned)?;
        table.last_id += 1;
        let id = UserId::new(table.last_id);
        table.rows.insert(id, profile.clone());
        Ok(id)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.rows.get(&id).map(|p| User::new(id, p.clone())))
    }

    async fn replace_by_id(&self, id: UserId, profile: &UserProfile) -> Result<u64, StoreError> {
        let mut table = self.table.write().map_err(poisoned)?;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = profile.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: UserId) -> Result<u64, StoreError> {
        let mut table = self.table.write().map_err(poisoned)?;
        Ok(u64::from(table.rows.remove(&id).is_some()))
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table
            .rows
            .iter()
            .map(|(id, p)| User::new(*id, p.clone()))
            .collect())
    }
}
