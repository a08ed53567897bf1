//! Key-value storage for everything the browser kept in local storage.
//!
//! Favorites, preferences, user-submitted cafés and reviews are stored as
//! JSON documents under fixed keys. Repositories own the encoding; a store
//! only moves strings.
//!
//! # Storage Types
//!
//! ## FileStore
//! - One `<key>.json` file per key inside a directory
//! - Survives restarts of the CLI
//!
//! ## MemoryStore
//! - In-memory map for tests and one-shot CLI runs
//!
//! # Example
//!
//! ```
//! use cafescout::storage::{StorageConfig, StorageFactory};
//!
//! # fn main() -> cafescout::error::Result<()> {
//! let store = StorageFactory::create(StorageConfig::Memory)?;
//! store.set("favorites", "[1, 5]")?;
//! assert_eq!(store.get("favorites")?.as_deref(), Some("[1, 5]"));
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{CafeScoutError, Result};

pub mod file;
pub mod memory;

/// Keys used by the repositories.
pub mod keys {
    pub const USER_CAFES: &str = "user_cafes";
    pub const FAVORITES: &str = "favorites";
    pub const USER_PREFERENCES: &str = "user_preferences";
    pub const CAFE_COMMENTS: &str = "cafe_comments";
    pub const REVIEW_LIKES: &str = "review_likes";
    pub const USER_PROFILE: &str = "user_profile";
    pub const CURRENCY_PREFERENCE: &str = "currency_preference";
}

/// A string-to-string store.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read the value under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently present, sorted.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Reject keys that could escape a storage directory.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(CafeScoutError::storage(format!("invalid storage key: {key:?}")))
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StorageConfig {
    /// Directory-backed storage.
    File(PathBuf),

    /// Non-persistent storage.
    #[default]
    Memory,
}

/// Creates a store from a [`StorageConfig`].
pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
        match config {
            StorageConfig::Memory => Ok(Arc::new(memory::MemoryStore::new())),
            StorageConfig::File(directory) => Ok(Arc::new(file::FileStore::open(directory)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("user_cafes").is_ok());
        assert!(validate_key("chat-history-1").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
    }

    #[test]
    fn test_factory_memory() {
        let store = StorageFactory::create(StorageConfig::Memory).unwrap();
        store.set("favorites", "[]").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["favorites".to_string()]);
    }
}
