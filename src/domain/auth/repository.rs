use async_trait::async_trait;
use uuid::Uuid;

use super::{RefreshToken, ResetPasswordDto};
use crate::domain::user::{CreateUserDto, User, UserCredentials};
use crate::domain::DomainResult;

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User>;
    async fn get_by_email(&self, email: &str) -> DomainResult<User>;
    async fn get_credentials_by_email(&self, email: &str) -> DomainResult<UserCredentials>;

    async fn store_refresh_token(&self, token: RefreshToken) -> DomainResult<()>;
    async fn delete_refresh_token_by_user_id(&self, user_id: Uuid) -> DomainResult<()>;

    /// Succeeds only when exactly one stored token matches.
    async fn check_refresh_token_exists(&self, refresh_token: &str) -> DomainResult<()>;
    /// Succeeds only when exactly one active user has this email.
    async fn check_email_exists(&self, email: &str) -> DomainResult<()>;

    async fn reset_password(&self, dto: ResetPasswordDto) -> DomainResult<()>;
}
