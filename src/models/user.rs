use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
///
/// This is the public shape of a user; the password hash never leaves the
/// database layer except inside [`UserRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A user together with their stored credential hash.
///
/// Internal to the auth flow; deliberately not serializable.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    /// PHC-formatted Argon2id hash.
    pub password_hash: String,
}

/// Credentials submitted to signup and login.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsInput {
    pub username: String,
    pub password: String,
}

/// Response for successful signup/login: a bearer token plus the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
