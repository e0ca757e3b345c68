//! The authenticated user's session.
//!
//! A session is persisted as five flat string keys so that any storage that
//! behaves like a key/value store can hold it.

use serde::{Deserialize, Serialize};

pub const KEY_AUTH_TOKEN: &str = "authToken";
pub const KEY_USERNAME: &str = "username";
pub const KEY_FULL_NAME: &str = "userFullName";
pub const KEY_EMAIL: &str = "userEmail";
pub const KEY_USER_ID: &str = "userId";

/// Every key a session writes, in write order.
pub const SESSION_KEYS: [&str; 5] = [
    KEY_AUTH_TOKEN,
    KEY_USERNAME,
    KEY_FULL_NAME,
    KEY_EMAIL,
    KEY_USER_ID,
];

/// Token and profile fields of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub user_id: String,
}

impl Session {
    /// Flatten into `(key, value)` pairs for storage.
    pub fn to_pairs(&self) -> [(&'static str, &str); 5] {
        [
            (KEY_AUTH_TOKEN, self.token.as_str()),
            (KEY_USERNAME, self.username.as_str()),
            (KEY_FULL_NAME, self.full_name.as_str()),
            (KEY_EMAIL, self.email.as_str()),
            (KEY_USER_ID, self.user_id.as_str()),
        ]
    }

    /// Rebuild from stored keys. Only the token is mandatory; missing profile
    /// fields come back empty.
    pub fn from_lookup<F>(mut get: F) -> Option<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let token = get(KEY_AUTH_TOKEN).filter(|t| !t.is_empty())?;
        Some(Self {
            token,
            username: get(KEY_USERNAME).unwrap_or_default(),
            full_name: get(KEY_FULL_NAME).unwrap_or_default(),
            email: get(KEY_EMAIL).unwrap_or_default(),
            user_id: get(KEY_USER_ID).unwrap_or_default(),
        })
    }
}

/// Name shown in the topbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
    pub full_name: String,
}

impl CurrentUser {
    /// Full name when known, else the username.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}
