//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod auth_repository;
pub mod repository_provider;
pub mod user_repository;

pub use auth_repository::SeaOrmAuthRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;
