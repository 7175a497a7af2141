//! Infrastructure layer - external concerns

pub mod cache;
pub mod crypto;
pub mod database;

pub use cache::{build_code_store, CacheBackend, CacheConfig};
pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, DatabaseConfig, PoolConfig};
