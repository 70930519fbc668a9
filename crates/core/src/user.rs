//! The user record.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Every field of a user except its identifier.
///
/// Fields are accepted verbatim; there is no format or range checking. An
/// absent field takes its type's default (empty string, zero).
///
/// `password` is stored and echoed back in plaintext. Do not carry this into a
/// deployment that holds real credentials without hashing it first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub age: i64,
}

/// A stored user: the profile plus its store-assigned identifier.
///
/// Serializes flat, as `{"id", "firstName", "lastName", "email", "password", "age"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl User {
    pub fn new(id: UserId, profile: UserProfile) -> Self {
        Self { id, profile }
    }
}
