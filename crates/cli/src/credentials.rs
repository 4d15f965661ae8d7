use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use traintrack::TokenStorage;

const SESSION_FILE: &str = "session.json";
const API_URL_KEY: &str = "api_url";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("could not determine a home directory for session storage")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(String),
}

fn storage_dir() -> Result<PathBuf, CredentialError> {
    let home = dirs::home_dir().ok_or(CredentialError::NoHomeDirectory)?;
    let dir = home.join(".traintrack");
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .map_err(|err| CredentialError::Io(format!("failed to create {}: {err}", dir.display())))?;
    }
    Ok(dir)
}

/// Session persistence: a flat key-value JSON file under `~/.traintrack`,
/// holding the two token keys plus the API URL they belong to.
///
/// Reads and writes go to disk on every access; the file is tiny and the
/// SDK's storage contract is synchronous.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn open_default() -> Result<Self, CredentialError> {
        Ok(Self { path: storage_dir()?.join(SESSION_FILE) })
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn api_url(&self) -> Option<String> {
        self.get(API_URL_KEY)
    }

    pub fn save_api_url(&self, url: &str) {
        self.set(API_URL_KEY, url);
    }

    fn read_map(&self) -> BTreeMap<String, String> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    fn write_map(&self, map: &BTreeMap<String, String>) {
        let json = match serde_json::to_string_pretty(map) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize session file");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to write session file");
        }
    }
}

impl TokenStorage for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_map().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.read_map();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map);
    }

    fn remove(&self, key: &str) {
        let mut map = self.read_map();
        if map.remove(key).is_some() {
            self.write_map(&map);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traintrack::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

    #[test]
    fn tokens_survive_reopening_the_store() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SESSION_FILE);

        let store = FileTokenStore::at_path(path.clone());
        store.set(ACCESS_TOKEN_KEY, "tokA");
        store.set(REFRESH_TOKEN_KEY, "tokR");
        store.save_api_url("http://localhost:8000/api");

        let reopened = FileTokenStore::at_path(path);
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("tokA"));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY).as_deref(), Some("tokR"));
        assert_eq!(reopened.api_url().as_deref(), Some("http://localhost:8000/api"));
    }

    #[test]
    fn remove_deletes_only_the_given_key() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileTokenStore::at_path(dir.path().join(SESSION_FILE));

        store.set(ACCESS_TOKEN_KEY, "tokA");
        store.set(REFRESH_TOKEN_KEY, "tokR");
        store.remove(ACCESS_TOKEN_KEY);

        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("tokR"));
    }

    #[test]
    fn corrupt_session_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SESSION_FILE);
        fs::write(&path, "not json").expect("write garbage");

        let store = FileTokenStore::at_path(path);
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
    }
}
