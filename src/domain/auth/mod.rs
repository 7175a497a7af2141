//! Authentication aggregate: refresh tokens, credential lookups and
//! verification codes.

pub mod code_store;
pub mod model;
pub mod repository;

pub use code_store::VerificationCodeStore;
pub use model::{RefreshToken, ResetPasswordDto};
pub use repository::AuthRepository;
