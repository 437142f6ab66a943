//! Integration tests for the iHUZA inventory dashboard.
//!
//! Each test works against a real [`FileStorage`] directory so restarts can
//! be simulated by reopening the same directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ihuza-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_flow` - Register, login, logout and restart
//! - `catalog_flow` - Products, categories and the dashboard overview
//! - `persistence` - On-disk format and corrupt data recovery
//! - `access_guard` - View access per session

use std::path::Path;
use std::sync::Arc;

use ihuza_core::{FileStorage, Inventory, KeyValueStore, RecoveryPolicy, StorageError};
use tempfile::TempDir;

/// A data directory that lives as long as the test.
#[derive(Debug)]
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Create an empty data directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Path of the data directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Storage over the data directory.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the directory cannot be opened.
    pub fn storage(&self) -> Result<Arc<FileStorage>, StorageError> {
        FileStorage::open(self.dir.path()).map(Arc::new)
    }

    /// Open an inventory, as a fresh process would.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a collection cannot be read.
    pub fn open(&self, recovery: RecoveryPolicy) -> Result<Inventory, Box<dyn std::error::Error>> {
        Ok(Inventory::open(self.storage()?, recovery)?)
    }

    /// Raw stored value for `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value cannot be read.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get(key)
    }

    /// Overwrite the stored value for `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value cannot be written.
    pub fn write_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set(key, value)
    }
}
