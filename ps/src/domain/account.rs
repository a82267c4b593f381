//! Registered user accounts

use serde::{Deserialize, Serialize};

/// A registered identity, keyed for login by its email
///
/// `credential` is an opaque marker reissued on every login. Nothing ever
/// verifies it, so it carries no security property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, generated at registration
    pub id: String,

    /// Display name
    pub username: String,

    /// Contact identifier, unique across accounts
    pub email: String,

    /// Session credential
    #[serde(rename = "token", default)]
    pub credential: String,
}

impl Account {
    /// Copy of this account carrying a different credential
    pub fn with_credential(&self, credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_credential_leaves_source_untouched() {
        let stored = Account {
            id: "u-1".to_string(),
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            credential: "tok_old".to_string(),
        };

        let session = stored.with_credential("tok_new");

        assert_eq!(session.credential, "tok_new");
        assert_eq!(session.id, stored.id);
        assert_eq!(stored.credential, "tok_old");
    }

    #[test]
    fn test_deserialize_browser_record() {
        let json = r#"{"id":"u-abc12","username":"alice","email":"alice@x.com","token":"jwt_xyz"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.credential, "jwt_xyz");

        // token was optional in the browser client
        let json = r#"{"id":"u-abc12","username":"alice","email":"alice@x.com"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(account.credential.is_empty());
    }
}
