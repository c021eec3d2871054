//! User profile and role as read from the CRM user store.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Language, UserId};

use super::PropertyPreferences;

/// CRM user roles; each maps to an assistant persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Developer,
    Agency,
    Agent,
    #[default]
    Buyer,
    Admin,
}

/// The slice of a CRM user the gateway needs: identity, role, preferred
/// language, and stored property preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub role: UserRole,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub preferences: PropertyPreferences,
}

impl UserProfile {
    /// Creates a profile with default preferences.
    pub fn new(id: UserId, role: UserRole) -> Self {
        Self {
            id,
            role,
            language: Language::default(),
            preferences: PropertyPreferences::default(),
        }
    }

    /// Sets the stored preferences.
    pub fn with_preferences(mut self, preferences: PropertyPreferences) -> Self {
        self.preferences = preferences;
        self
    }
}
