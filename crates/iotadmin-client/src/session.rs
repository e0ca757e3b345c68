//! Session persistence on top of a [`SessionStorage`].

use crate::error::StorageError;
use crate::storage::{MemoryStorage, SessionStorage};
use iotadmin_core::session::{KEY_AUTH_TOKEN, SESSION_KEYS, Session};
use iotadmin_core::CurrentUser;
use std::sync::Arc;

/// Reads and writes the five session keys.
#[derive(Clone)]
pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Session kept in memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    /// The stored session, if a token is present.
    pub async fn session(&self) -> Option<Session> {
        let mut values = Vec::with_capacity(SESSION_KEYS.len());
        for key in SESSION_KEYS {
            values.push((key, self.storage.get(key).await));
        }
        Session::from_lookup(|k| {
            values
                .iter()
                .find(|(key, _)| *key == k)
                .and_then(|(_, v)| v.clone())
        })
    }

    pub async fn token(&self) -> Option<String> {
        self.storage.get(KEY_AUTH_TOKEN).await.filter(|t| !t.is_empty())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_some()
    }

    pub async fn current_user(&self) -> Option<CurrentUser> {
        self.session().await.map(|s| CurrentUser {
            username: s.username,
            full_name: s.full_name,
        })
    }

    /// Persist all five keys.
    pub async fn save(&self, session: &Session) -> Result<(), StorageError> {
        self.storage.set_many(&session.to_pairs()).await
    }

    /// Remove all five keys.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_many(&SESSION_KEYS).await
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Session {
        Session {
            token: "tok".into(),
            username: "admin".into(),
            full_name: "Admin Root".into(),
            email: "admin@example.com".into(),
            user_id: "1".into(),
        }
    }

    #[tokio::test]
    async fn save_then_clear() {
        let sessions = SessionManager::in_memory();
        assert!(!sessions.is_authenticated().await);

        sessions.save(&sample()).await.unwrap();
        assert!(sessions.is_authenticated().await);
        assert_eq!(sessions.session().await, Some(sample()));
        assert_eq!(sessions.current_user().await.unwrap().display_name(), "Admin Root");

        sessions.clear().await.unwrap();
        assert_eq!(sessions.session().await, None);
    }
}
