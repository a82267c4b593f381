//! PrismaStore - session and task record store
//!
//! Owns every piece of durable PrismaFlow state: registered accounts, tasks,
//! and the active session. State lives in an injected [`Backend`], a flat
//! key/value medium addressed by three logical keys, so the same store runs
//! in memory for tests and on disk for the CLI.
//!
//! # Architecture
//!
//! ```text
//! <data-dir>/
//! ├── .lock                    # fs2 advisory lock held while writing
//! ├── prisma_flow_users.json   # accounts collection
//! ├── prisma_flow_tasks.json   # tasks collection (owner-tagged)
//! └── prisma_session.json      # active session snapshot (absent when signed out)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use prismastore::{FileBackend, Priority, RecordStore};
//!
//! let store = RecordStore::with_backend(FileBackend::open("~/.local/share/prismaflow")?).await?;
//! store.register("alice", "alice@x.com").await?;
//! let task = store.create_task("Audit", "", Priority::Medium, due).await?;
//! ```

mod backend;
mod domain;
mod error;
mod store;

pub use backend::{ACCOUNTS_KEY, Backend, FileBackend, MemoryBackend, SESSION_KEY, TASKS_KEY};
pub use domain::{Account, IdGenerator, PipelineStats, Priority, RandomIds, Task, TaskPatch};
pub use error::{StoreError, StoreResult};
pub use store::RecordStore;
