//! Application layer: use-case services over the repository ports.

pub mod identity;

pub use identity::{AuthService, UserService};
