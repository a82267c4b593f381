//! Persistence backends
//!
//! A [`Backend`] is a flat key/value medium. Implementors supply raw string
//! reads and writes; the typed collection methods are provided on top and
//! always rewrite a whole collection at once.

mod file;
mod memory;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{Account, Task};
use crate::error::{StoreError, StoreResult};

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Key holding the accounts collection
pub const ACCOUNTS_KEY: &str = "prisma_flow_users";

/// Key holding the tasks collection
pub const TASKS_KEY: &str = "prisma_flow_tasks";

/// Key holding the active session snapshot
pub const SESSION_KEY: &str = "prisma_session";

/// Key/value persistence medium injected into the record store
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read the raw value under `key`, or `None` if absent
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value under `key`
    async fn write(&self, key: &str, value: String) -> StoreResult<()>;

    /// Remove `key`; removing an absent key is not an error
    async fn remove(&self, key: &str) -> StoreResult<()>;

    async fn load_accounts(&self) -> StoreResult<Vec<Account>> {
        let raw = self.read(ACCOUNTS_KEY).await?;
        Ok(decode(ACCOUNTS_KEY, raw)?.unwrap_or_default())
    }

    async fn save_accounts(&self, accounts: &[Account]) -> StoreResult<()> {
        debug!(count = accounts.len(), "save_accounts: called");
        self.write(ACCOUNTS_KEY, encode(ACCOUNTS_KEY, accounts)?).await
    }

    async fn load_tasks(&self) -> StoreResult<Vec<Task>> {
        let raw = self.read(TASKS_KEY).await?;
        Ok(decode(TASKS_KEY, raw)?.unwrap_or_default())
    }

    async fn save_tasks(&self, tasks: &[Task]) -> StoreResult<()> {
        debug!(count = tasks.len(), "save_tasks: called");
        self.write(TASKS_KEY, encode(TASKS_KEY, tasks)?).await
    }

    async fn load_session(&self) -> StoreResult<Option<Account>> {
        let raw = self.read(SESSION_KEY).await?;
        decode(SESSION_KEY, raw)
    }

    /// Persist the session snapshot; `None` clears it
    async fn save_session(&self, session: Option<&Account>) -> StoreResult<()> {
        match session {
            Some(account) => {
                debug!(account_id = %account.id, "save_session: storing session");
                self.write(SESSION_KEY, encode(SESSION_KEY, account)?).await
            }
            None => {
                debug!("save_session: clearing session");
                self.remove(SESSION_KEY).await
            }
        }
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}

fn decode<T: DeserializeOwned>(key: &str, raw: Option<String>) -> StoreResult<Option<T>> {
    raw.map(|raw| {
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use chrono::{NaiveDate, Utc};

    fn account(id: &str) -> Account {
        Account {
            id: id.to_string(),
            username: "alice".to_string(),
            email: format!("{}@x.com", id),
            credential: "tok_a".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_keys_read_as_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.load_accounts().await.unwrap().is_empty());
        assert!(backend.load_tasks().await.unwrap().is_empty());
        assert!(backend.load_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_collections_round_trip_through_raw_keys() {
        let backend = MemoryBackend::new();
        backend.save_accounts(&[account("u-1"), account("u-2")]).await.unwrap();

        let raw = backend.read(ACCOUNTS_KEY).await.unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"token\":\"tok_a\""));

        let loaded = backend.load_accounts().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].id, "u-2");
    }

    #[tokio::test]
    async fn test_save_session_none_removes_key() {
        let backend = MemoryBackend::new();
        backend.save_session(Some(&account("u-1"))).await.unwrap();
        assert!(backend.read(SESSION_KEY).await.unwrap().is_some());

        backend.save_session(None).await.unwrap();
        assert!(backend.read(SESSION_KEY).await.unwrap().is_none());
        assert!(backend.load_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_reported() {
        let backend = MemoryBackend::new();
        backend.write(TASKS_KEY, "not json".to_string()).await.unwrap();

        let err = backend.load_tasks().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == TASKS_KEY));
    }

    #[test]
    fn test_unserializable_value_is_an_encode_error() {
        let value = std::collections::HashMap::from([((1u8, 2u8), "pair")]);

        let err = encode("k", &value).unwrap_err();
        assert!(matches!(err, StoreError::Encode { ref key, .. } if key == "k"));
    }

    #[tokio::test]
    async fn test_tasks_keep_order() {
        let backend = MemoryBackend::new();
        let tasks: Vec<Task> = ["a", "b", "c"]
            .iter()
            .map(|id| Task {
                id: id.to_string(),
                title: id.to_uppercase(),
                description: String::new(),
                priority: Priority::Low,
                due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                completed: false,
                owner_id: "u-1".to_string(),
                created_at: Utc::now(),
            })
            .collect();

        backend.save_tasks(&tasks).await.unwrap();
        let ids: Vec<String> = backend.load_tasks().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
