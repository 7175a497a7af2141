//! In-process repositories for service and router tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    AuthRepository, CreateUserDto, DomainError, DomainResult, GetUsersDto, RefreshToken,
    RepositoryProvider, ResetPasswordDto, UpdateUserDto, UpdatedUser, User, UserCredentials,
    UserRepository, VerificationCodeStore,
};
use crate::infrastructure::cache::InMemoryCodeStore;
use crate::shared::PaginatedResult;

#[derive(Clone)]
struct Row {
    user: User,
    password_hash: String,
    updated_at: Option<DateTime<Utc>>,
    deleted: bool,
}

#[derive(Default)]
pub(crate) struct FakeRepos {
    rows: Mutex<Vec<Row>>,
    tokens: Mutex<Vec<RefreshToken>>,
    codes: InMemoryCodeStore,
    fail_next_role_change: AtomicBool,
}

impl FakeRepos {
    /// Insert an active user and return its id.
    pub fn seed(&self, email: &str, password: &str, role: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(Row {
            user: User {
                id,
                email: email.into(),
                full_name: "Seeded User".into(),
                user_role: role.into(),
                created_at: Utc::now(),
            },
            password_hash: bcrypt::hash(password, 4).unwrap(),
            updated_at: None,
            deleted: false,
        });
        id
    }

    /// Make the next `change_user_role` call fail with `StoreUnavailable`.
    pub fn fail_next_role_change(&self) {
        self.fail_next_role_change.store(true, Ordering::SeqCst);
    }

    pub fn password_matches(&self, id: Uuid, password: &str) -> bool {
        let rows = self.rows.lock().unwrap();
        let row = rows.iter().find(|r| r.user.id == id).unwrap();
        bcrypt::verify(password, &row.password_hash).unwrap()
    }

    fn with_active<T>(&self, pred: impl Fn(&Row) -> bool, f: impl FnOnce(&mut Row) -> T) -> Option<T> {
        let mut rows = self.rows.lock().unwrap();
        rows.iter_mut().find(|r| !r.deleted && pred(r)).map(f)
    }
}

impl RepositoryProvider for FakeRepos {
    fn auth(&self) -> &dyn AuthRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn codes(&self) -> &dyn VerificationCodeStore {
        &self.codes
    }
}

#[async_trait]
impl AuthRepository for FakeRepos {
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        if self.with_active(|r| r.user.email == dto.email, |_| ()).is_some() {
            return Err(DomainError::Conflict("auth.create: email already registered".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: dto.email,
            full_name: dto.full_name,
            user_role: "user".into(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(Row {
            user: user.clone(),
            password_hash: dto.password_hash,
            updated_at: None,
            deleted: false,
        });
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> DomainResult<User> {
        self.with_active(|r| r.user.email == email, |r| r.user.clone())
            .ok_or_else(|| DomainError::not_found("User", "email", email))
    }

    async fn get_credentials_by_email(&self, email: &str) -> DomainResult<UserCredentials> {
        self.with_active(
            |r| r.user.email == email,
            |r| UserCredentials {
                user_id: r.user.id,
                password_hash: r.password_hash.clone(),
            },
        )
        .ok_or_else(|| DomainError::not_found("User", "email", email))
    }

    async fn store_refresh_token(&self, token: RefreshToken) -> DomainResult<()> {
        self.tokens.lock().unwrap().push(token);
        Ok(())
    }

    async fn delete_refresh_token_by_user_id(&self, user_id: Uuid) -> DomainResult<()> {
        self.tokens.lock().unwrap().retain(|t| t.user_id != user_id);
        Ok(())
    }

    async fn check_refresh_token_exists(&self, refresh_token: &str) -> DomainResult<()> {
        let count = self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.refresh_token == refresh_token)
            .count();
        match count {
            1 => Ok(()),
            0 => Err(DomainError::not_found("RefreshToken", "refresh_token", "<redacted>")),
            n => Err(DomainError::Internal(format!("expected one match, found {n}"))),
        }
    }

    async fn check_email_exists(&self, email: &str) -> DomainResult<()> {
        self.get_by_email(email).await.map(|_| ())
    }

    async fn reset_password(&self, dto: ResetPasswordDto) -> DomainResult<()> {
        self.with_active(|r| r.user.email == dto.email, |r| {
            r.password_hash = dto.new_password_hash.clone();
            r.updated_at = Some(Utc::now());
        })
        .ok_or_else(|| DomainError::not_found("User", "email", &dto.email))
    }
}

#[async_trait]
impl UserRepository for FakeRepos {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<User> {
        self.with_active(|r| r.user.id == id, |r| r.user.clone())
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    async fn get_all(&self, dto: GetUsersDto) -> DomainResult<PaginatedResult<User>> {
        dto.validate()?;
        let filter = &dto.filter;
        let mut matched: Vec<User> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.deleted)
            .map(|r| r.user.clone())
            .filter(|u| filter.full_name.as_ref().map_or(true, |v| &u.full_name == v))
            .filter(|u| filter.email.as_ref().map_or(true, |v| &u.email == v))
            .filter(|u| filter.user_role.as_ref().map_or(true, |v| &u.user_role == v))
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(dto.pagination.offset() as usize)
            .take(dto.pagination.limit as usize)
            .collect();
        Ok(PaginatedResult::new(items, total, dto.pagination.page, dto.pagination.limit))
    }

    async fn update(&self, id: Uuid, dto: UpdateUserDto) -> DomainResult<UpdatedUser> {
        self.with_active(|r| r.user.id == id, |r| {
            if let Some(full_name) = dto.full_name {
                r.user.full_name = full_name;
            }
            if let Some(email) = dto.email {
                r.user.email = email;
            }
            if let Some(hash) = dto.password_hash {
                r.password_hash = hash;
            }
            r.updated_at = Some(Utc::now());
            UpdatedUser {
                id: r.user.id,
                email: r.user.email.clone(),
                full_name: r.user.full_name.clone(),
                user_role: r.user.user_role.clone(),
                created_at: r.user.created_at,
                updated_at: r.updated_at,
            }
        })
        .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.with_active(|r| r.user.id == id, |r| r.deleted = true);
        Ok(())
    }

    async fn check_password_matches(&self, user_id: Uuid, candidate: &str) -> DomainResult<bool> {
        let hash = self
            .with_active(|r| r.user.id == user_id, |r| r.password_hash.clone())
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;
        bcrypt::verify(candidate, &hash).map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn change_password(&self, user_id: Uuid, new_password_hash: &str) -> DomainResult<()> {
        self.with_active(|r| r.user.id == user_id, |r| {
            r.password_hash = new_password_hash.to_owned();
            r.updated_at = Some(Utc::now());
        })
        .ok_or_else(|| DomainError::not_found("User", "id", user_id))
    }

    async fn change_user_role(&self, user_id: Uuid, new_user_role: &str) -> DomainResult<()> {
        if self.fail_next_role_change.swap(false, Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable("users.change_user_role: injected".into()));
        }
        self.with_active(|r| r.user.id == user_id, |r| {
            r.user.user_role = new_user_role.to_owned();
            r.updated_at = Some(Utc::now());
        })
        .ok_or_else(|| DomainError::not_found("User", "id", user_id))
    }
}
