//! RecordStore - the session and task record store
//!
//! Every mutation loads the affected collection, changes it, and writes the
//! whole collection back. There is no locking across operations: overlapping
//! writers on one collection resolve last-write-wins.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::domain::{Account, IdGenerator, PipelineStats, Priority, RandomIds, Task, TaskPatch, validate_title};
use crate::error::{StoreError, StoreResult};

/// Session-scoped access to accounts and tasks
pub struct RecordStore {
    backend: Arc<dyn Backend>,
    ids: Arc<dyn IdGenerator>,
    session: RwLock<Option<Account>>,
}

impl RecordStore {
    /// Open a store over `backend`, restoring any persisted session
    pub async fn open(backend: Arc<dyn Backend>, ids: Arc<dyn IdGenerator>) -> StoreResult<Self> {
        debug!("open: called");
        let session = backend.load_session().await?;

        if let Some(account) = &session {
            let accounts = backend.load_accounts().await?;
            if !accounts.iter().any(|a| a.id == account.id) {
                warn!(account_id = %account.id, "open: restored session has no matching account");
            }
            info!(account_id = %account.id, "Restored session");
        }

        Ok(Self {
            backend,
            ids,
            session: RwLock::new(session),
        })
    }

    /// Open a store with the default ID generator
    pub async fn with_backend(backend: impl Backend + 'static) -> StoreResult<Self> {
        Self::open(Arc::new(backend), Arc::new(RandomIds)).await
    }

    // === Session operations ===

    /// Current session snapshot, if signed in
    pub fn session(&self) -> Option<Account> {
        self.session.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Register a new account and sign in as it
    pub async fn register(&self, username: &str, email: &str) -> StoreResult<Account> {
        debug!(%username, %email, "register: called");
        require_non_blank("username", username)?;
        require_non_blank("email", email)?;

        let mut accounts = self.backend.load_accounts().await?;
        if accounts.iter().any(|a| a.email == email) {
            debug!(%email, "register: email already registered");
            return Err(StoreError::DuplicateIdentity(email.to_string()));
        }

        let account = Account {
            id: self.ids.account_id(),
            username: username.to_string(),
            email: email.to_string(),
            credential: self.ids.credential(),
        };
        accounts.push(account.clone());
        self.backend.save_accounts(&accounts).await?;
        self.set_session(Some(account.clone())).await?;

        info!(account_id = %account.id, "Registered account");
        Ok(account)
    }

    /// Sign in with an existing email
    ///
    /// The returned session copy carries a fresh credential; the stored
    /// account record is not rewritten.
    pub async fn login(&self, email: &str) -> StoreResult<Account> {
        debug!(%email, "login: called");
        let accounts = self.backend.load_accounts().await?;
        let account = accounts
            .iter()
            .find(|a| a.email == email)
            .ok_or_else(|| StoreError::IdentityNotFound(email.to_string()))?;

        let session = account.with_credential(self.ids.credential());
        self.set_session(Some(session.clone())).await?;

        info!(account_id = %session.id, "Logged in");
        Ok(session)
    }

    /// Sign out; a no-op when already signed out
    pub async fn logout(&self) -> StoreResult<()> {
        debug!("logout: called");
        self.set_session(None).await
    }

    async fn set_session(&self, session: Option<Account>) -> StoreResult<()> {
        self.backend.save_session(session.as_ref()).await?;
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
        Ok(())
    }

    // === Task operations ===

    /// Tasks owned by the signed-in account, in creation order
    ///
    /// Returns an empty list when nobody is signed in.
    pub async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let Some(account) = self.session() else {
            debug!("list_tasks: no session");
            return Ok(Vec::new());
        };

        let tasks = self.backend.load_tasks().await?;
        let owned: Vec<Task> = tasks.into_iter().filter(|t| t.is_owned_by(&account.id)).collect();
        debug!(count = owned.len(), "list_tasks: loaded");
        Ok(owned)
    }

    /// Create a task owned by the signed-in account
    pub async fn create_task(
        &self,
        title: &str,
        description: &str,
        priority: Priority,
        due_date: NaiveDate,
    ) -> StoreResult<Task> {
        debug!(%title, %priority, %due_date, "create_task: called");
        let account = self.session().ok_or(StoreError::Unauthorized)?;
        validate_title(title)?;

        let task = Task {
            id: self.ids.task_id(),
            title: title.to_string(),
            description: description.to_string(),
            priority,
            due_date,
            completed: false,
            owner_id: account.id,
            created_at: Utc::now(),
        };

        let mut tasks = self.backend.load_tasks().await?;
        tasks.push(task.clone());
        self.backend.save_tasks(&tasks).await?;

        info!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Merge `patch` into the task with `id`
    ///
    /// Ownership is not checked: any caller holding an ID can update it.
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> StoreResult<Task> {
        debug!(%id, ?patch, "update_task: called");
        let mut tasks = self.backend.load_tasks().await?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;

        patch.validate()?;
        patch.apply(task);
        let updated = task.clone();

        self.backend.save_tasks(&tasks).await?;
        info!(task_id = %id, "Updated task");
        Ok(updated)
    }

    /// Delete the task with `id`; unknown IDs are ignored
    pub async fn delete_task(&self, id: &str) -> StoreResult<()> {
        debug!(%id, "delete_task: called");
        let mut tasks = self.backend.load_tasks().await?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        if tasks.len() == before {
            debug!(%id, "delete_task: no such task");
            return Ok(());
        }

        self.backend.save_tasks(&tasks).await?;
        info!(task_id = %id, "Deleted task");
        Ok(())
    }

    /// Workload metrics for the signed-in account
    pub async fn stats(&self) -> StoreResult<PipelineStats> {
        let tasks = self.list_tasks().await?;
        Ok(PipelineStats::from_tasks(&tasks))
    }
}

fn require_non_blank(field: &'static str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidField {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
