//! Authentication service: registration, login, refresh tokens and
//! verification codes.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, RefreshToken, RepositoryProvider, ResetPasswordDto,
    User,
};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Hash checked when the email is unknown, so both login failures cost one
/// bcrypt verification.
fn decoy_hash() -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| hash_password("decoy-password").unwrap_or_default())
}

pub struct AuthService {
    repos: Arc<dyn RepositoryProvider>,
    code_ttl: Duration,
}

impl AuthService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, code_ttl: Duration) -> Self {
        Self { repos, code_ttl }
    }

    // ── Accounts ────────────────────────────────────────────────

    pub async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        let user = self
            .repos
            .auth()
            .create(dto)
            .await
            .inspect_err(|e| error!(operation = "auth.create", error = %e, "create user failed"))?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn get_by_email(&self, email: &str) -> DomainResult<User> {
        self.repos
            .auth()
            .get_by_email(email)
            .await
            .inspect_err(|e| error!(operation = "auth.get_by_email", error = %e, "lookup failed"))
    }

    /// Authenticate by email and password.
    ///
    /// An unknown email and a wrong password both yield the same
    /// `Unauthorized` error.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<User> {
        let creds = match self.repos.auth().get_credentials_by_email(email).await {
            Ok(creds) => creds,
            Err(DomainError::NotFound { .. }) => {
                let candidate = password.to_owned();
                let _ = tokio::task::spawn_blocking(move || verify_password(&candidate, decoy_hash()))
                    .await;
                return Err(DomainError::Unauthorized("Invalid credentials".into()));
            }
            Err(e) => {
                error!(operation = "auth.login", error = %e, "credential lookup failed");
                return Err(e);
            }
        };

        let candidate = password.to_owned();
        let hash = creds.password_hash;
        let valid = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .map_err(|e| DomainError::Internal(format!("auth.login: {e}")))?
            .map_err(|e| {
                error!(operation = "auth.login", user_id = %creds.user_id, error = %e, "stored hash is malformed");
                DomainError::Internal(format!("auth.login: {e}"))
            })?;

        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        self.repos
            .users()
            .get_by_id(creds.user_id)
            .await
            .inspect_err(|e| error!(operation = "auth.login", error = %e, "user lookup failed"))
    }

    pub async fn check_email_exists(&self, email: &str) -> DomainResult<()> {
        self.repos
            .auth()
            .check_email_exists(email)
            .await
            .inspect_err(|e| error!(operation = "auth.check_email_exists", error = %e, "check failed"))
    }

    /// Overwrite the password of the active user with this email. Callers
    /// are expected to have proven ownership of the address first.
    pub async fn reset_password(&self, dto: ResetPasswordDto) -> DomainResult<()> {
        self.repos
            .auth()
            .reset_password(dto)
            .await
            .inspect_err(|e| error!(operation = "auth.reset_password", error = %e, "reset failed"))
    }

    // ── Refresh tokens ──────────────────────────────────────────

    pub async fn store_refresh_token(&self, token: RefreshToken) -> DomainResult<()> {
        self.repos
            .auth()
            .store_refresh_token(token)
            .await
            .inspect_err(|e| error!(operation = "auth.store_refresh_token", error = %e, "store failed"))
    }

    pub async fn delete_refresh_token_by_user_id(&self, user_id: Uuid) -> DomainResult<()> {
        self.repos
            .auth()
            .delete_refresh_token_by_user_id(user_id)
            .await
            .inspect_err(|e| {
                error!(operation = "auth.delete_refresh_token_by_user_id", error = %e, "delete failed")
            })
    }

    pub async fn check_refresh_token_exists(&self, refresh_token: &str) -> DomainResult<()> {
        self.repos
            .auth()
            .check_refresh_token_exists(refresh_token)
            .await
            .inspect_err(|e| {
                error!(operation = "auth.check_refresh_token_exists", error = %e, "check failed")
            })
    }

    // ── Verification codes ──────────────────────────────────────

    pub async fn save_verification_code(&self, email: &str, code: &str) -> DomainResult<()> {
        self.repos
            .codes()
            .save_code(email, code, self.code_ttl)
            .await
            .inspect_err(|e| error!(operation = "auth.save_verification_code", error = %e, "save failed"))
    }

    /// Check a code and consume it on match.
    pub async fn verify_code(&self, email: &str, code: &str) -> DomainResult<bool> {
        self.repos
            .codes()
            .take_code(email, code)
            .await
            .inspect_err(|e| error!(operation = "auth.verify_code", error = %e, "take failed"))
    }
}
