//! User model for storage and API.

use serde::Serialize;

/// User row as stored in SQLite.
///
/// Immutable once created except for deletion; deleting a user cascades to
/// their reservations via the foreign key.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Unique login email
    pub email: String,
    /// bcrypt hash; never serialized
    pub password_hash: String,
    /// Display name
    pub name: String,
    /// Admin capability flag
    pub is_admin: bool,
    /// When the account was created (RFC3339)
    pub created_at: String,
}

/// User shape exposed over the API (no credential material).
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}
