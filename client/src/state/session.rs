//! Durable session storage backed by origin-scoped key-value storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth controller keeps the live session in memory; this module is the
//! copy that survives reloads. In the browser the backend is `localStorage`,
//! shared by every tab of the origin without change notification, so two tabs
//! logging in/out race with last-write-wins semantics.
//!
//! ERROR HANDLING
//! ==============
//! Storage can be unavailable (SSR, privacy mode, quota). `load` never fails:
//! it logs and reports an empty session. Writes return `StorageError` so the
//! caller can log and carry on with an unpersisted session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::SessionUser;

/// Storage key holding the bearer token string.
pub const TOKEN_KEY: &str = "admin_jwt_token";
/// Storage key holding the cached user as JSON (`{"id": ..., "role": ...}`).
pub const USER_KEY: &str = "admin_user";

/// Failure touching the persistent key-value storage.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No storage object exists in this environment.
    #[error("persistent storage is unavailable")]
    Unavailable,
    /// The storage object rejected the operation.
    #[error("storage access failed: {0}")]
    Access(String),
}

/// Synchronous string key-value storage (the `localStorage` contract).
pub trait KeyValueStore: Clone + Send + Sync + 'static {
    /// # Errors
    ///
    /// Returns [`StorageError`] when the storage cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] when the write is rejected.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] when the removal is rejected.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// The window's `localStorage`, looked up on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or(StorageError::Unavailable)?;
    match window.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(StorageError::Unavailable),
        Err(e) => Err(StorageError::Access(format!("{e:?}"))),
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .get_item(key)
                .map_err(|e| StorageError::Access(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Access(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Access(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}

/// Session fields as found in storage. Either may be absent; a token without a
/// cached user is legacy data and is kept as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
}

/// Typed access to the two session keys.
#[derive(Clone, Debug, Default)]
pub struct SessionStore<S> {
    backend: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Read the persisted session. Missing keys, unreadable storage and
    /// corrupt user JSON all yield absent fields.
    pub fn load(&self) -> StoredSession {
        let token = match self.backend.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                leptos::logging::warn!("session load: token unreadable: {e}");
                return StoredSession::default();
            }
        };

        let user = match self.backend.get_item(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    leptos::logging::warn!("session load: discarding malformed user record: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                leptos::logging::warn!("session load: user unreadable: {e}");
                None
            }
        };

        StoredSession { token, user }
    }

    /// Persist token then user as two independent writes.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`]; a failed user write leaves the token
    /// already written.
    pub fn save(&self, token: &str, user: &SessionUser) -> Result<(), StorageError> {
        self.backend.set_item(TOKEN_KEY, token)?;
        let raw = serde_json::to_string(user).map_err(|e| StorageError::Access(e.to_string()))?;
        self.backend.set_item(USER_KEY, &raw)
    }

    /// Remove both keys. Both removals are attempted even if the first fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] encountered.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.backend.remove_item(TOKEN_KEY);
        let user = self.backend.remove_item(USER_KEY);
        token.and(user)
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory storage backends for controller tests.

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::{KeyValueStore, StorageError};

    /// Shared map; clones see the same data, like two mounts on one origin.
    #[derive(Clone, Debug, Default)]
    pub struct MemoryStorage {
        items: Arc<Mutex<HashMap<String, String>>>,
    }

    impl MemoryStorage {
        pub fn get(&self, key: &str) -> Option<String> {
            self.items.lock().unwrap().get(key).cloned()
        }

        pub fn insert(&self, key: &str, value: &str) {
            self.items.lock().unwrap().insert(key.to_owned(), value.to_owned());
        }
    }

    impl KeyValueStore for MemoryStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.get(key))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.insert(key, value);
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.items.lock().unwrap().remove(key);
            Ok(())
        }
    }

    /// Storage that rejects every operation, as in browser privacy mode.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct FailingStorage;

    impl KeyValueStore for FailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Access("SecurityError".to_owned()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Access("QuotaExceededError".to_owned()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Access("SecurityError".to_owned()))
        }
    }
}
