//! User aggregate
//!
//! Contains the User records, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto;

pub use model::{UpdatedUser, User, UserCredentials};

pub use dto::{
    ChangePasswordDto, ChangeUserRoleDto, CreateUserDto, GetUsersDto, UpdateUserDto, UserFilter,
};

pub use repository::UserRepository;
