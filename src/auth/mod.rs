//! Authentication primitives: password hashing and session tokens

pub mod jwt;
pub mod password;

pub use jwt::{Claims, TokenError, TokenService};
pub use password::PasswordHasher;
