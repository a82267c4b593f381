//! Domain types for PrismaStore
//!
//! Core records: Account and Task. Both serialize with camelCase field names
//! so collections exported by the PrismaFlow browser client load unchanged.

mod account;
mod id;
mod priority;
mod stats;
mod task;

pub use account::Account;
pub use id::{IdGenerator, RandomIds};
pub use priority::Priority;
pub use stats::PipelineStats;
pub use task::{Task, TaskPatch};

pub(crate) use task::validate_title;
