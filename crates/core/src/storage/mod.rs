//! Key-value persistence boundary.
//!
//! Every store in this crate persists through a [`KeyValueStore`]: one string
//! key per collection, the whole collection JSON-encoded as the value. The
//! contract is the same as a browser's `localStorage`
//! (get/set/remove by key, synchronous, last writer wins), so data exported
//! from the web dashboard can be dropped into a [`FileStorage`] directory.
//!
//! # Keys
//!
//! | Key | Value |
//! |---|---|
//! | [`keys::CURRENT_USER`] | signed-in principal, absent when signed out |
//! | [`keys::USERS`] | user records (credentials and managed users) |
//! | [`keys::CATEGORIES`] | category records |
//! | [`keys::PRODUCTS`] | product records |
//!
//! # Implementations
//!
//! - [`MemoryStorage`] - in-process map with an optional byte quota
//! - [`FileStorage`] - one `<key>.json` file per key in a directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage keys used by the dashboard.
pub mod keys {
    /// Signed-in principal.
    pub const CURRENT_USER: &str = "currentUser";
    /// User records.
    pub const USERS: &str = "users";
    /// Category records.
    pub const CATEGORIES: &str = "categories";
    /// Product records.
    pub const PRODUCTS: &str = "products";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key contains characters the backend cannot address.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Writing the value would exceed the backend's capacity.
    #[error("storage quota exceeded writing {key}: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Configured capacity in bytes.
        quota: usize,
    },

    /// Underlying I/O failure.
    #[error("storage I/O error on {key}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Synchronous string key-value store.
///
/// Implementations must be safe to share between the stores of one
/// [`Inventory`](crate::Inventory); they are not required to coordinate with
/// other processes.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value cannot be written. The previous
    /// value is left in place.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Keys are restricted so every backend can map them to a file name.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key(keys::CURRENT_USER).is_ok());
        assert!(validate_key("products_v2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }
}
