//! Authentication module: registration, login, refresh tokens,
//! password reset and verification codes

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
