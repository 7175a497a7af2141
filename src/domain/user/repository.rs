use async_trait::async_trait;
use uuid::Uuid;

use super::{GetUsersDto, UpdateUserDto, UpdatedUser, User};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<User>;
    async fn get_all(&self, dto: GetUsersDto) -> DomainResult<PaginatedResult<User>>;

    async fn update(&self, id: Uuid, dto: UpdateUserDto) -> DomainResult<UpdatedUser>;
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Compare `candidate` against the stored hash of `user_id` only.
    /// A mismatch is `Ok(false)`, not an error.
    async fn check_password_matches(&self, user_id: Uuid, candidate: &str) -> DomainResult<bool>;
    async fn change_password(&self, user_id: Uuid, new_password_hash: &str) -> DomainResult<()>;
    async fn change_user_role(&self, user_id: Uuid, new_user_role: &str) -> DomainResult<()>;
}
