//! PostgreSQL implementation of AuthRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult};
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::{
    AuthRepository, CreateUserDto, DomainError, DomainResult, RefreshToken, ResetPasswordDto,
    User, UserCredentials,
};
use crate::infrastructure::database::errors::store_err;
use crate::infrastructure::database::query_builder::{statement, NamedParams};
use crate::infrastructure::database::rows::{CountRow, CredentialsRow, UserRow, USER_COLUMNS};

pub struct SeaOrmAuthRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAuthRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Runs a `count(*)` statement and requires exactly one match.
    async fn expect_single(
        &self,
        operation: &'static str,
        template: &str,
        params: NamedParams,
        not_found: DomainError,
    ) -> DomainResult<()> {
        let count = CountRow::find_by_statement(statement(template, &params)?)
            .one(self.db.as_ref())
            .await
            .map_err(|e| store_err(operation, e))?
            .map_or(0, |row| row.count);

        match count {
            1 => Ok(()),
            0 => Err(not_found),
            n => {
                error!(operation, count = n, "expected a single match");
                Err(DomainError::Internal(format!(
                    "{operation}: expected one match, found {n}"
                )))
            }
        }
    }
}

#[async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        let params = NamedParams::new()
            .with("email", dto.email)
            .with("password_hash", dto.password_hash)
            .with("full_name", dto.full_name)
            .with("created_at", Utc::now());

        let stmt = statement(
            &format!(
                "insert into users (email, password_hash, full_name, created_at) \
                 values (@email, @password_hash, @full_name, @created_at) \
                 returning {USER_COLUMNS}"
            ),
            &params,
        )?;

        UserRow::find_by_statement(stmt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| store_err("auth.create", e))?
            .map(User::from)
            .ok_or_else(|| DomainError::Internal("auth.create: insert returned no row".into()))
    }

    async fn get_by_email(&self, email: &str) -> DomainResult<User> {
        let stmt = statement(
            &format!("select {USER_COLUMNS} from users where email = @email and deleted_at is null"),
            &NamedParams::new().with("email", email),
        )?;

        UserRow::find_by_statement(stmt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| store_err("auth.get_by_email", e))?
            .map(User::from)
            .ok_or_else(|| DomainError::not_found("User", "email", email))
    }

    async fn get_credentials_by_email(&self, email: &str) -> DomainResult<UserCredentials> {
        let stmt = statement(
            "select id, password_hash from users where email = @email and deleted_at is null",
            &NamedParams::new().with("email", email),
        )?;

        CredentialsRow::find_by_statement(stmt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| store_err("auth.get_credentials_by_email", e))?
            .map(UserCredentials::from)
            .ok_or_else(|| DomainError::not_found("User", "email", email))
    }

    async fn store_refresh_token(&self, token: RefreshToken) -> DomainResult<()> {
        let stmt = statement(
            "insert into refresh_tokens (user_id, refresh_token, expires_in) \
             values (@user_id, @refresh_token, @expires_in)",
            &NamedParams::new()
                .with("user_id", token.user_id)
                .with("refresh_token", token.refresh_token)
                .with("expires_in", token.expires_in),
        )?;

        self.db
            .execute(stmt)
            .await
            .map_err(|e| store_err("auth.store_refresh_token", e))?;
        Ok(())
    }

    async fn delete_refresh_token_by_user_id(&self, user_id: Uuid) -> DomainResult<()> {
        let stmt = statement(
            "delete from refresh_tokens where user_id = @user_id",
            &NamedParams::new().with("user_id", user_id),
        )?;

        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| store_err("auth.delete_refresh_token_by_user_id", e))?;

        debug!(%user_id, rows = result.rows_affected(), "refresh tokens removed");
        Ok(())
    }

    async fn check_refresh_token_exists(&self, refresh_token: &str) -> DomainResult<()> {
        self.expect_single(
            "auth.check_refresh_token_exists",
            "select count(*) as count from refresh_tokens where refresh_token = @refresh_token",
            NamedParams::new().with("refresh_token", refresh_token),
            DomainError::not_found("RefreshToken", "refresh_token", "<redacted>"),
        )
        .await
    }

    async fn check_email_exists(&self, email: &str) -> DomainResult<()> {
        self.expect_single(
            "auth.check_email_exists",
            "select count(*) as count from users where email = @email and deleted_at is null",
            NamedParams::new().with("email", email),
            DomainError::not_found("User", "email", email),
        )
        .await
    }

    async fn reset_password(&self, dto: ResetPasswordDto) -> DomainResult<()> {
        let stmt = statement(
            "update users set password_hash = @password_hash, updated_at = now() \
             where email = @email and deleted_at is null",
            &NamedParams::new()
                .with("password_hash", dto.new_password_hash)
                .with("email", dto.email.as_str()),
        )?;

        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| store_err("auth.reset_password", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("User", "email", dto.email));
        }
        Ok(())
    }
}
