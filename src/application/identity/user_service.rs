//! User management service: application-layer orchestration
//!
//! HTTP handlers are thin wrappers that delegate here.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{
    ChangePasswordDto, ChangeUserRoleDto, DomainError, DomainResult, GetUsersDto,
    RepositoryProvider, UpdateUserDto, UpdatedUser, User,
};
use crate::shared::PaginatedResult;

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_by_id(&self, id: Uuid) -> DomainResult<User> {
        self.repos
            .users()
            .get_by_id(id)
            .await
            .inspect_err(|e| error!(operation = "users.get_by_id", %id, error = %e, "lookup failed"))
    }

    /// List active users, newest first.
    pub async fn get_all(&self, dto: GetUsersDto) -> DomainResult<PaginatedResult<User>> {
        self.repos
            .users()
            .get_all(dto)
            .await
            .inspect_err(|e| error!(operation = "users.get_all", error = %e, "listing failed"))
    }

    // ── Commands (mutations) ────────────────────────────────────

    pub async fn update(&self, id: Uuid, dto: UpdateUserDto) -> DomainResult<UpdatedUser> {
        self.repos
            .users()
            .update(id, dto)
            .await
            .inspect_err(|e| error!(operation = "users.update", %id, error = %e, "update failed"))
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.repos
            .users()
            .delete(id)
            .await
            .inspect_err(|e| error!(operation = "users.delete", %id, error = %e, "delete failed"))?;

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(&self, dto: ChangePasswordDto) -> DomainResult<()> {
        let users = self.repos.users();

        let matches = users
            .check_password_matches(dto.user_id, &dto.current_password)
            .await
            .inspect_err(|e| {
                error!(operation = "users.change_password", user_id = %dto.user_id, error = %e, "verification failed")
            })?;

        if !matches {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        users
            .change_password(dto.user_id, &dto.new_password_hash)
            .await
            .inspect_err(|e| {
                error!(operation = "users.change_password", user_id = %dto.user_id, error = %e, "update failed")
            })?;

        info!(user_id = %dto.user_id, "Password changed");
        Ok(())
    }

    pub async fn change_user_role(&self, dto: ChangeUserRoleDto) -> DomainResult<()> {
        self.repos
            .users()
            .change_user_role(dto.user_id, &dto.new_user_role)
            .await
            .inspect_err(|e| {
                error!(operation = "users.change_user_role", user_id = %dto.user_id, error = %e, "update failed")
            })?;

        info!(user_id = %dto.user_id, role = %dto.new_user_role, "User role changed");
        Ok(())
    }
}
