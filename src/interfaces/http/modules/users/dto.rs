//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{UpdatedUser, User};
use crate::shared::{format_optional_timestamp, format_timestamp};

/// User API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub user_role: String,
    /// `dd.mm.yyyy hh:mm:ss`, UTC
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email,
            full_name: u.full_name,
            user_role: u.user_role,
            created_at: format_timestamp(&u.created_at),
        }
    }
}

/// User as stored right after an update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatedUserDto {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub user_role: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<UpdatedUser> for UpdatedUserDto {
    fn from(u: UpdatedUser) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email,
            full_name: u.full_name,
            user_role: u.user_role,
            created_at: format_timestamp(&u.created_at),
            updated_at: format_optional_timestamp(u.updated_at.as_ref()),
        }
    }
}

/// List users query parameters. Blank values are ignored.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Exact full name
    pub full_name: Option<String>,
    /// Exact email
    pub email: Option<String>,
    /// Exact role (e.g. `user`, `admin`)
    pub user_role: Option<String>,
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size, at least 1
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// Partial update. Omitted fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "full name must be 1-255 characters"))]
    pub full_name: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    /// Already-hashed password
    #[validate(length(min = 1, message = "password hash must not be empty"))]
    pub password_hash: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "current password is required"))]
    pub current_password: String,
    /// Already-hashed replacement
    #[validate(length(min = 1, message = "new password hash is required"))]
    pub new_password_hash: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeUserRoleRequest {
    #[validate(length(min = 1, max = 50, message = "role must be 1-50 characters"))]
    pub new_user_role: String,
}
