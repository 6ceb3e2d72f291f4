//! Persistent key/value storage holding the signed-in user.
//!
//! The user is stored under [`USER_KEY`] as a JSON document
//! (`{"type": "Employee", "email": "..."}`). Components never read it
//! themselves: the caller resolves a [`SessionUser`] once and injects it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SessionError;
use crate::model::SessionUser;

pub const USER_KEY: &str = "user";

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: String) -> Result<(), SessionError>;
    fn remove_item(&mut self, key: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), SessionError> {
        self.items.remove(key);
        Ok(())
    }
}

/// JSON file backed storage; every write is flushed to disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let items = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, items })
    }

    fn flush(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.items)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.items.insert(key.to_string(), value);
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), SessionError> {
        self.items.remove(key);
        self.flush()
    }
}

pub fn current_user(store: &impl KeyValueStore) -> Result<SessionUser, SessionError> {
    let raw = store.get_item(USER_KEY).ok_or(SessionError::SignedOut)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn sign_in(store: &mut impl KeyValueStore, user: &SessionUser) -> Result<(), SessionError> {
    store.set_item(USER_KEY, serde_json::to_string(user)?)?;
    tracing::info!(email = %user.email, kind = ?user.kind, "signed in");
    Ok(())
}

pub fn sign_out(store: &mut impl KeyValueStore) -> Result<(), SessionError> {
    store.remove_item(USER_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserType;

    #[test]
    fn signed_out_without_user_key() {
        let store = MemoryStorage::new();
        assert!(matches!(current_user(&store), Err(SessionError::SignedOut)));
    }

    #[test]
    fn reads_user_written_by_hand() {
        let mut store = MemoryStorage::new();
        store
            .set_item(USER_KEY, r#"{"type":"Employee","email":"employee@test.tld"}"#.into())
            .unwrap();
        let user = current_user(&store).unwrap();
        assert_eq!(user.kind, UserType::Employee);
        assert_eq!(user.email, "employee@test.tld");
    }

    #[test]
    fn malformed_user_is_an_error() {
        let mut store = MemoryStorage::new();
        store.set_item(USER_KEY, "not json".into()).unwrap();
        assert!(matches!(current_user(&store), Err(SessionError::Malformed(_))));
    }

    #[test]
    fn file_storage_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = FileStorage::open(&path).unwrap();
        sign_in(&mut store, &SessionUser::employee("a@a")).unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(current_user(&reopened).unwrap().email, "a@a");

        let mut reopened = reopened;
        sign_out(&mut reopened).unwrap();
        assert!(current_user(&FileStorage::open(&path).unwrap()).is_err());
    }
}
