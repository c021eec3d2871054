//! In-memory user reader serving preset profiles.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserProfile;
use crate::ports::UserReader;

/// In-memory UserReader for tests. Optionally fails every lookup to
/// exercise degraded paths.
#[derive(Default)]
pub struct InMemoryUserReader {
    users: RwLock<HashMap<UserId, UserProfile>>,
    failing: bool,
}

impl InMemoryUserReader {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reader whose every lookup fails with a database error.
    pub fn failing() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            failing: true,
        }
    }

    /// Adds a profile.
    pub fn with_user(self, profile: UserProfile) -> Self {
        self.users
            .write()
            .expect("InMemoryUserReader: lock poisoned")
            .insert(profile.id, profile);
        self
    }
}

#[async_trait]
impl UserReader for InMemoryUserReader {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        if self.failing {
            return Err(DomainError::database("user store unreachable"));
        }
        Ok(self
            .users
            .read()
            .expect("InMemoryUserReader: lock poisoned")
            .get(id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;

    #[tokio::test]
    async fn lookup_returns_preset_profile() {
        let id = UserId::new();
        let reader = InMemoryUserReader::new().with_user(UserProfile::new(id, UserRole::Agent));

        let profile = reader.find_by_id(&id).await.unwrap();
        assert_eq!(profile.unwrap().role, UserRole::Agent);

        let missing = reader.find_by_id(&UserId::new()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn failing_reader_errors() {
        let reader = InMemoryUserReader::failing();
        assert!(reader.find_by_id(&UserId::new()).await.is_err());
    }
}
