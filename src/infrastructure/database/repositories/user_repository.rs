//! PostgreSQL implementation of UserRepository
//!
//! Listing and partial updates are assembled from only the fields the caller
//! supplied, rendered through [`query_builder`] into positional statements.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    DomainError, DomainResult, GetUsersDto, UpdateUserDto, UpdatedUser, User, UserFilter,
    UserRepository,
};
use crate::infrastructure::crypto::password::verify_password;
use crate::infrastructure::database::errors::store_err;
use crate::infrastructure::database::query_builder::{statement, NamedParams};
use crate::infrastructure::database::rows::{
    CountRow, PasswordHashRow, UpdatedUserRow, UserRow, UPDATED_USER_COLUMNS, USER_COLUMNS,
};
use crate::shared::PaginatedResult;

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

// ── Statement builders ──────────────────────────────────────────

/// Predicate shared by the listing and the count query.
fn filter_predicate(filter: &UserFilter, params: &mut NamedParams) -> String {
    let mut conditions = vec!["deleted_at is null"];

    if let Some(full_name) = &filter.full_name {
        conditions.push("full_name = @full_name");
        params.insert("full_name", full_name.as_str());
    }
    if let Some(email) = &filter.email {
        conditions.push("email = @email");
        params.insert("email", email.as_str());
    }
    if let Some(user_role) = &filter.user_role {
        conditions.push("user_role = @user_role");
        params.insert("user_role", user_role.as_str());
    }

    conditions.join(" and ")
}

/// Returns `(count, page)` statements built from one predicate.
pub(crate) fn list_statements(dto: &GetUsersDto) -> DomainResult<(Statement, Statement)> {
    let mut params = NamedParams::new();
    let predicate = filter_predicate(&dto.filter, &mut params);

    let count = statement(
        &format!("select count(*) as count from users where {predicate}"),
        &params,
    )?;

    let offset = i64::try_from(dto.pagination.offset())
        .map_err(|_| DomainError::InvalidInput("page is out of range".into()))?;
    params
        .insert("limit", i64::from(dto.pagination.limit))
        .insert("offset", offset);

    let page = statement(
        &format!(
            "select {USER_COLUMNS} from users where {predicate} \
             order by created_at desc limit @limit offset @offset"
        ),
        &params,
    )?;

    Ok((count, page))
}

pub(crate) fn update_statement(id: Uuid, dto: &UpdateUserDto) -> DomainResult<Statement> {
    let mut params = NamedParams::new().with("id", id);
    let mut assignments = Vec::new();

    if let Some(full_name) = &dto.full_name {
        assignments.push("full_name = @full_name");
        params.insert("full_name", full_name.as_str());
    }
    if let Some(email) = &dto.email {
        assignments.push("email = @email");
        params.insert("email", email.as_str());
    }
    if let Some(password_hash) = &dto.password_hash {
        assignments.push("password_hash = @password_hash");
        params.insert("password_hash", password_hash.as_str());
    }
    assignments.push("updated_at = now()");

    statement(
        &format!(
            "update users set {} where id = @id and deleted_at is null \
             returning {UPDATED_USER_COLUMNS}",
            assignments.join(", ")
        ),
        &params,
    )
}

pub(crate) fn password_hash_statement(user_id: Uuid) -> DomainResult<Statement> {
    statement(
        "select password_hash from users where id = @id and deleted_at is null",
        &NamedParams::new().with("id", user_id),
    )
}

fn by_id_statement(id: Uuid) -> DomainResult<Statement> {
    statement(
        &format!("select {USER_COLUMNS} from users where id = @id and deleted_at is null"),
        &NamedParams::new().with("id", id),
    )
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<User> {
        UserRow::find_by_statement(by_id_statement(id)?)
            .one(self.db.as_ref())
            .await
            .map_err(|e| store_err("users.get_by_id", e))?
            .map(User::from)
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    async fn get_all(&self, dto: GetUsersDto) -> DomainResult<PaginatedResult<User>> {
        dto.validate()?;
        let (count_stmt, page_stmt) = list_statements(&dto)?;
        debug!(sql = %page_stmt.sql, "listing users");

        let count = CountRow::find_by_statement(count_stmt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| store_err("users.get_all.count", e))?
            .map_or(0, |row| row.count);

        let users = UserRow::find_by_statement(page_stmt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| store_err("users.get_all", e))?
            .into_iter()
            .map(User::from)
            .collect();

        Ok(PaginatedResult::new(
            users,
            u64::try_from(count).unwrap_or_default(),
            dto.pagination.page,
            dto.pagination.limit,
        ))
    }

    async fn update(&self, id: Uuid, dto: UpdateUserDto) -> DomainResult<UpdatedUser> {
        UpdatedUserRow::find_by_statement(update_statement(id, &dto)?)
            .one(self.db.as_ref())
            .await
            .map_err(|e| store_err("users.update", e))?
            .map(UpdatedUser::from)
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let stmt = statement(
            "update users set deleted_at = now() where id = @id and deleted_at is null",
            &NamedParams::new().with("id", id),
        )?;

        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| store_err("users.delete", e))?;

        debug!(user_id = %id, rows = result.rows_affected(), "soft delete");
        Ok(())
    }

    async fn check_password_matches(&self, user_id: Uuid, candidate: &str) -> DomainResult<bool> {
        let stored = PasswordHashRow::find_by_statement(password_hash_statement(user_id)?)
            .one(self.db.as_ref())
            .await
            .map_err(|e| store_err("users.check_password_matches", e))?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        let candidate = candidate.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&candidate, &stored.password_hash))
            .await
            .map_err(|e| DomainError::Internal(format!("users.check_password_matches: {e}")))?
            .map_err(|e| DomainError::Internal(format!("users.check_password_matches: {e}")))
    }

    async fn change_password(&self, user_id: Uuid, new_password_hash: &str) -> DomainResult<()> {
        let stmt = statement(
            "update users set password_hash = @password_hash, updated_at = now() \
             where id = @id and deleted_at is null",
            &NamedParams::new()
                .with("password_hash", new_password_hash)
                .with("id", user_id),
        )?;

        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| store_err("users.change_password", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("User", "id", user_id));
        }
        Ok(())
    }

    async fn change_user_role(&self, user_id: Uuid, new_user_role: &str) -> DomainResult<()> {
        let stmt = statement(
            "update users set user_role = @user_role, updated_at = now() \
             where id = @id and deleted_at is null",
            &NamedParams::new()
                .with("user_role", new_user_role)
                .with("id", user_id),
        )?;

        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| store_err("users.change_user_role", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("User", "id", user_id));
        }
        Ok(())
    }
}
