//! Authentication DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    /// Already-hashed password
    #[validate(length(min = 1, message = "password hash is required"))]
    pub password_hash: String,
    #[validate(length(min = 1, max = 255, message = "full name must be 1-255 characters"))]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StoreRefreshTokenRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "refresh token is required"))]
    pub refresh_token: String,
    /// RFC 3339 expiry instant
    pub expires_in: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckRefreshTokenRequest {
    #[validate(length(min = 1, message = "refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckEmailRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "new password hash is required"))]
    pub new_password_hash: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveVerificationCodeRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, max = 12, message = "code must be 4-12 characters"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyCodeRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyCodeResponse {
    pub valid: bool,
}
