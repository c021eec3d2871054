//! User Reader Port - read-only user profile lookups.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserProfile;

/// Read-only access to the CRM user store.
#[async_trait]
pub trait UserReader: Send + Sync {
    /// Looks up a user profile; `Ok(None)` when the id is unknown.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;
}
