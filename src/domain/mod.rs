//! Domain layer: records, DTOs and repository ports.

pub mod auth;
pub mod repositories;
pub mod user;

// Re-export commonly used types
pub use auth::{AuthRepository, RefreshToken, ResetPasswordDto, VerificationCodeStore};
pub use repositories::{DomainResult, RepositoryProvider};
pub use user::{
    ChangePasswordDto, ChangeUserRoleDto, CreateUserDto, GetUsersDto, UpdateUserDto, UpdatedUser,
    User, UserCredentials, UserFilter, UserRepository,
};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
