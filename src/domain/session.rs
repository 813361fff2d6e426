use serde::{Deserialize, Serialize};
use super::User;

/// An authenticated session: the bearer token and the user it belongs to.
///
/// Serialized as `{"user": ..., "token": ...}`, the shape kept in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self { user, token: token.into() }
    }
}
