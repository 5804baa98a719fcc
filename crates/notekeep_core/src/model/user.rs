//! Note owner model.
//!
//! Users only exist so notes have an owner and requests can be attributed.

use serde::{Deserialize, Serialize};

/// System-assigned user identifier.
pub type UserId = i64;

/// Maximum accepted username length, in characters.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Public view of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    pub user: User,
    /// Opaque bearer token used to authenticate later requests.
    pub api_token: String,
}
