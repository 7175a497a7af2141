//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to the per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::auth::{AuthRepository, VerificationCodeStore};
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Built once at startup around the shared connection pool and handed to
/// the services explicitly:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().get_by_id(id).await?;
///     repos.auth().check_email_exists(&user.email).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn auth(&self) -> &dyn AuthRepository;
    fn users(&self) -> &dyn UserRepository;
    fn codes(&self) -> &dyn VerificationCodeStore;
}
