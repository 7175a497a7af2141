//! Identity module: accounts & authentication
//!
//! `AuthService` covers registration, login, refresh tokens and
//! verification codes; `UserService` covers account management.

pub mod auth_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod fakes;

pub use auth_service::AuthService;
pub use user_service::UserService;
