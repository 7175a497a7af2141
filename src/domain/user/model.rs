//! User domain records

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An active (not soft-deleted) user account.
///
/// The password hash is deliberately absent: it is only reachable through
/// [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub user_role: String,
    pub created_at: DateTime<Utc>,
}

/// Post-update view of a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub user_role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Stored secret of a user, used only to verify a login.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub password_hash: String,
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("user_id", &self.user_id)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_never_prints_hash() {
        let creds = UserCredentials {
            user_id: Uuid::nil(),
            password_hash: "$2b$12$secret".into(),
        };
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
