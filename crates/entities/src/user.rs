//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Minimum age accepted for an account.
pub const MINIMUM_USER_AGE: u32 = 15;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Age in years, at least [`MINIMUM_USER_AGE`].
    pub age: u32,
    /// Whether the user agreed to be contacted.
    pub can_be_contacted: bool,
    /// Whether the user agreed to share their data.
    pub can_data_be_shared: bool,
    /// Administrative account, hidden from the user directory.
    pub is_staff: bool,
    /// Argon2 PHC string.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns true if the age satisfies the minimum age rule.
    pub fn is_valid_age(age: u32) -> bool {
        age >= MINIMUM_USER_AGE
    }
}

/// Data required to register a user. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub can_be_contacted: bool,
    pub can_data_be_shared: bool,
    pub is_staff: bool,
    pub password_hash: String,
}

impl NewUser {
    /// Creates registration data with both consent flags unset.
    pub fn new(username: impl Into<String>, age: u32, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            age,
            can_be_contacted: false,
            can_data_be_shared: false,
            is_staff: false,
            password_hash: password_hash.into(),
        }
    }

    /// Sets first and last name.
    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Sets the consent flags.
    pub fn with_consents(mut self, can_be_contacted: bool, can_data_be_shared: bool) -> Self {
        self.can_be_contacted = can_be_contacted;
        self.can_data_be_shared = can_data_be_shared;
        self
    }

    /// Marks the account as administrative.
    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    /// Builds the stored record.
    pub fn into_user(self, id: UserId) -> User {
        let now = Utc::now();
        User {
            id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            can_be_contacted: self.can_be_contacted,
            can_data_be_shared: self.can_data_be_shared,
            is_staff: self.is_staff,
            password_hash: self.password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
