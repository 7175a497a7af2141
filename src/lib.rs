//! # users-service
//!
//! User account microservice: registration, login, refresh tokens,
//! verification codes and account management over PostgreSQL.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Records, DTOs and repository ports
//! - **application**: Use-case services (`AuthService`, `UserService`)
//! - **infrastructure**: PostgreSQL repositories, query builder, code stores, bcrypt
//! - **interfaces**: REST API with OpenAPI document
//! - **shared**: Error types, pagination, timestamps, shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
