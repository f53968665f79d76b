//! Authentication: Argon2id password hashing, HS256 bearer tokens, and the
//! [`AuthUser`] extractor that protects every owner-scoped route.

mod extract;
mod jwt;
mod password;

pub use extract::AuthUser;
pub use jwt::{issue_token, validate_token, Claims};
pub use password::{hash_password, verify_password};

/// Minimum accepted password length, matching the signup contract.
pub const MIN_PASSWORD_LEN: usize = 6;
