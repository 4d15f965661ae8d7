use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use traintrack_core::authentication::types::{AccessToken, RefreshToken, TokenPair};

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Raw key-value persistence for the credential pair.
///
/// Implementations must be synchronous and cheap: the dispatcher reads the
/// access token on every outgoing request. The CLI plugs in a file-backed
/// store so sessions survive process restarts.
pub trait TokenStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage, the default for library use and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: RwLock<HashMap<String, String>>,
}

impl TokenStorage for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.write().unwrap_or_else(PoisonError::into_inner).remove(key);
    }
}

/// Typed facade over whichever storage backs the client.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn TokenStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.storage.get(ACCESS_TOKEN_KEY).map(AccessToken::new)
    }

    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.storage.get(REFRESH_TOKEN_KEY).map(RefreshToken::new)
    }

    pub fn set_pair(&self, pair: &TokenPair) {
        self.storage.set(ACCESS_TOKEN_KEY, pair.access.as_str());
        self.storage.set(REFRESH_TOKEN_KEY, pair.refresh.as_str());
    }

    /// Overwrites the access token only; the refresh token is not rotated.
    pub fn set_access(&self, token: &AccessToken) {
        self.storage.set(ACCESS_TOKEN_KEY, token.as_str());
    }

    /// Deletes both tokens. Used on logout and irrecoverable refresh failure.
    pub fn clear(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_stored_under_fixed_keys() {
        let store = TokenStore::in_memory();
        store.set_pair(&TokenPair {
            access: AccessToken::new("tokA"),
            refresh: RefreshToken::new("tokR"),
        });
        assert_eq!(store.access_token().unwrap().as_str(), "tokA");
        assert_eq!(store.refresh_token().unwrap().as_str(), "tokR");

        store.set_access(&AccessToken::new("tokB"));
        assert_eq!(store.access_token().unwrap().as_str(), "tokB");
        // refresh token untouched by an access overwrite
        assert_eq!(store.refresh_token().unwrap().as_str(), "tokR");
    }

    #[test]
    fn clear_removes_both_tokens() {
        let store = TokenStore::in_memory();
        store.set_pair(&TokenPair {
            access: AccessToken::new("a"),
            refresh: RefreshToken::new("r"),
        });
        store.clear();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }
}
