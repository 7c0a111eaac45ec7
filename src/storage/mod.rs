//! Persistent key-value storage
//!
//! The quote cache is a pair of string slots in a shared key-value store,
//! the same contract a browser's local storage offers. `FileStore` persists
//! each key as a file on disk; `MemoryStore` keeps everything in process.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when writing to a store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be mapped to a storage slot
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// String key-value store shared by everything that reads the quote cache
///
/// Writes are last-writer-wins; there is no locking across processes.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
