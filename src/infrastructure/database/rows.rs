//! Row shapes returned by the raw user and token statements.

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use uuid::Uuid;

use crate::domain::{UpdatedUser, User, UserCredentials};

/// Columns selected by every user lookup.
pub const USER_COLUMNS: &str = "id, email, full_name, user_role, created_at";

/// Columns returned after an update.
pub const UPDATED_USER_COLUMNS: &str = "id, email, full_name, user_role, created_at, updated_at";

#[derive(Debug, FromQueryResult)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub user_role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            user_role: row.user_role,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromQueryResult)]
pub struct UpdatedUserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub user_role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UpdatedUserRow> for UpdatedUser {
    fn from(row: UpdatedUserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            user_role: row.user_role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromQueryResult)]
pub struct CredentialsRow {
    pub id: Uuid,
    pub password_hash: String,
}

impl From<CredentialsRow> for UserCredentials {
    fn from(row: CredentialsRow) -> Self {
        Self {
            user_id: row.id,
            password_hash: row.password_hash,
        }
    }
}

#[derive(FromQueryResult)]
pub struct PasswordHashRow {
    pub password_hash: String,
}

#[derive(Debug, FromQueryResult)]
pub struct CountRow {
    pub count: i64,
}
