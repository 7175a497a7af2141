use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A refresh token issued to a user. The user owns no tokens; tokens only
/// reference the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub user_id: Uuid,
    pub refresh_token: String,
    pub expires_in: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ResetPasswordDto {
    pub email: String,
    pub new_password_hash: String,
}
