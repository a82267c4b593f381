//! Identifier and credential generation
//!
//! Account IDs use the format `u-{uuid}` and task IDs `task-{uuid}`, both
//! UUID v7 so they sort by creation time. Credentials are `tok_` followed by
//! 32 random alphanumerics: a placeholder capability marker, not a signed token.

use rand::distr::{Alphanumeric, SampleString};

/// Length of the random part of a credential
const CREDENTIAL_LEN: usize = 32;

/// Source of fresh identifiers for the store
///
/// Injected so tests can make IDs deterministic.
pub trait IdGenerator: Send + Sync {
    /// ID for a newly registered account
    fn account_id(&self) -> String;

    /// ID for a newly created task
    fn task_id(&self) -> String;

    /// Fresh session credential
    fn credential(&self) -> String;
}

/// Default generator: UUID v7 IDs and random credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn account_id(&self) -> String {
        format!("u-{}", uuid::Uuid::now_v7())
    }

    fn task_id(&self) -> String {
        format!("task-{}", uuid::Uuid::now_v7())
    }

    fn credential(&self) -> String {
        format!("tok_{}", Alphanumeric.sample_string(&mut rand::rng(), CREDENTIAL_LEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_formats() {
        let ids = RandomIds;
        assert!(ids.account_id().starts_with("u-"));
        assert!(ids.task_id().starts_with("task-"));

        let credential = ids.credential();
        assert!(credential.starts_with("tok_"));
        assert_eq!(credential.len(), 4 + CREDENTIAL_LEN);
        assert!(credential[4..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_ids_are_unique() {
        let ids = RandomIds;
        let tasks: HashSet<String> = (0..500).map(|_| ids.task_id()).collect();
        assert_eq!(tasks.len(), 500);

        let credentials: HashSet<String> = (0..500).map(|_| ids.credential()).collect();
        assert_eq!(credentials.len(), 500);
    }
}
