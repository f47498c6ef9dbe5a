//! Hosted auth backend port.

use uuid::Uuid;

use crate::{AuthError, Role, Session};

/// Port trait for the hosted auth/database backend used by the route guard.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync + 'static {
    /// Resolves a session token. `Ok(None)` means the token is not a live session.
    async fn session(&self, token: &str) -> Result<Option<Session>, AuthError>;

    /// Looks up the profile role of a user. `Ok(None)` means no profile row.
    async fn role(&self, user_id: Uuid) -> Result<Option<Role>, AuthError>;
}
