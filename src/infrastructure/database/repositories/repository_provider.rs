//! SeaORM implementation of RepositoryProvider

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::{AuthRepository, RepositoryProvider, UserRepository, VerificationCodeStore};

use super::auth_repository::SeaOrmAuthRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and the verification code store chosen at
/// startup.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(Arc::clone(&db), codes);
/// let user = repos.users().get_by_id(id).await?;
/// repos.auth().check_email_exists(&user.email).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    auth: SeaOrmAuthRepository,
    users: SeaOrmUserRepository,
    codes: Arc<dyn VerificationCodeStore>,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: Arc<DatabaseConnection>, codes: Arc<dyn VerificationCodeStore>) -> Self {
        Self {
            auth: SeaOrmAuthRepository::new(Arc::clone(&db)),
            users: SeaOrmUserRepository::new(db),
            codes,
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn auth(&self) -> &dyn AuthRepository {
        &self.auth
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn codes(&self) -> &dyn VerificationCodeStore {
        self.codes.as_ref()
    }
}
