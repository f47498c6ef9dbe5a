//! Authenticated visitor sessions for the back-office guard.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A session vouched for by the hosted auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Profile role. Only `"admin"` grants back-office access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Maps a stored profile role; anything other than exactly `"admin"`
    /// is a member.
    pub fn from_profile_str(role: &str) -> Self {
        if role == "admin" {
            Role::Admin
        } else {
            Role::Member
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}
