use crate::model::role::Role;
use serde::{Deserialize, Serialize};

/// A registered identity. The name is unique and acts as the ID; users
/// are created at registration and never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    /// Argon2 hash of the password, never the raw credential.
    pub password_hash: String,
    pub role: Role,
}
