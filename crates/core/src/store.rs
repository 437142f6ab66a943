//! Generic collection store.
//!
//! An [`EntityStore`] owns one storage key and keeps the entire collection of
//! one record type under it as a JSON array. Every operation reads the whole
//! array, and every mutation writes the whole array back. There is no
//! indexing, no locking across processes and no partial write: two processes
//! mutating the same key concurrently lose one of the updates.
//!
//! Record types plug in through the [`Entity`] trait, which supplies the
//! storage key, how a new record is built from caller input, how a partial
//! update is applied, and the sample data written on first start.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::storage::{KeyValueStore, StorageError};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend could not be read.
    #[error("failed to read {key}: {source}")]
    Unavailable {
        /// Storage key being read.
        key: &'static str,
        /// Backend error.
        #[source]
        source: StorageError,
    },

    /// The storage backend rejected a write. The in-memory result of the
    /// operation is still valid; only durability was lost.
    #[error("failed to persist {key}: {source}")]
    Persistence {
        /// Storage key being written.
        key: &'static str,
        /// Backend error.
        #[source]
        source: StorageError,
    },

    /// The persisted value is not valid JSON for this collection.
    #[error("persisted {key} is malformed: {source}")]
    MalformedState {
        /// Storage key holding the bad value.
        key: &'static str,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded.
    #[error("failed to encode {key}: {source}")]
    Encode {
        /// Storage key being written.
        key: &'static str,
        /// Encoding error.
        #[source]
        source: serde_json::Error,
    },

    /// Password hashing failed while building a user record.
    #[error("password hashing error")]
    PasswordHash,

    /// Built-in sample data for a collection could not be built.
    #[error("sample data for {key} is invalid: {reason}")]
    InvalidSeed {
        /// Storage key being seeded.
        key: &'static str,
        /// What was wrong.
        reason: String,
    },
}

/// What to do when a persisted collection fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Drop the corrupted value, write the sample data back and continue.
    #[default]
    Reseed,
    /// Leave storage untouched and return [`StoreError::MalformedState`].
    Fail,
}

impl fmt::Display for RecoveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reseed => f.write_str("reseed"),
            Self::Fail => f.write_str("fail"),
        }
    }
}

impl std::str::FromStr for RecoveryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reseed" => Ok(Self::Reseed),
            "fail" => Ok(Self::Fail),
            _ => Err(format!("invalid recovery policy: {s} (expected reseed or fail)")),
        }
    }
}

/// A record type persisted by an [`EntityStore`].
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug {
    /// Identifier type.
    type Id: PartialEq + fmt::Display;
    /// Caller input for [`EntityStore::create`].
    type Draft;
    /// Partial update for [`EntityStore::update`]. Must not be able to
    /// change the identifier.
    type Patch;

    /// Storage key holding the collection.
    const KEY: &'static str;

    /// The record's identifier.
    fn id(&self) -> &Self::Id;

    /// Build a new record with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if a derived field cannot be computed.
    fn from_draft(draft: Self::Draft, now: DateTime<Utc>) -> Result<Self, StoreError>;

    /// Shallow-merge `patch` into the record. Fields the patch leaves unset
    /// keep their current value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if a derived field cannot be computed.
    fn apply(&mut self, patch: Self::Patch) -> Result<(), StoreError>;

    /// Sample records written the first time the key is found empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if a derived field cannot be computed.
    fn seed(now: DateTime<Utc>) -> Result<Vec<Self>, StoreError>;
}

/// CRUD store over one JSON-encoded collection.
pub struct EntityStore<E> {
    storage: Arc<dyn KeyValueStore>,
    recovery: RecoveryPolicy,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            recovery: self.recovery,
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for EntityStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("entity", &std::any::type_name::<E>())
            .field("recovery", &self.recovery)
            .finish_non_exhaustive()
    }
}

impl<E: Entity> EntityStore<E> {
    /// Create a store over `storage`. Nothing is read until [`initialize`].
    ///
    /// [`initialize`]: Self::initialize
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, recovery: RecoveryPolicy) -> Self {
        Self {
            storage,
            recovery,
            _entity: PhantomData,
        }
    }

    /// Load the collection, writing the sample data if the key has never been
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the sample data cannot be
    /// written, or [`StoreError::MalformedState`] under
    /// [`RecoveryPolicy::Fail`].
    pub fn initialize(&self) -> Result<Vec<E>, StoreError> {
        match self.read_raw()? {
            Some(raw) => self.decode(&raw),
            None => {
                info!(key = E::KEY, "seeding empty collection");
                self.reseed()
            }
        }
    }

    /// All records in insertion order.
    ///
    /// An absent key reads as an empty collection.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if storage cannot be read or decoded.
    pub fn list(&self) -> Result<Vec<E>, StoreError> {
        match self.read_raw()? {
            Some(raw) => self.decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    /// Number of records.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if storage cannot be read or decoded.
    pub fn len(&self) -> Result<usize, StoreError> {
        self.list().map(|records| records.len())
    }

    /// Whether the collection is empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if storage cannot be read or decoded.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }

    /// Linear scan for the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if storage cannot be read or decoded.
    pub fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        Ok(self.list()?.into_iter().find(|record| record.id() == id))
    }

    /// Build a record from `draft`, append it and persist the collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the collection cannot be
    /// written.
    pub fn create(&self, draft: E::Draft) -> Result<E, StoreError> {
        let record = E::from_draft(draft, Utc::now())?;
        self.insert(record)
    }

    /// Append an already-built record and persist the collection.
    pub(crate) fn insert(&self, record: E) -> Result<E, StoreError> {
        let mut records = self.list()?;
        records.push(record.clone());
        self.write(&records)?;
        info!(key = E::KEY, id = %record.id(), "created record");
        Ok(record)
    }

    /// Merge `patch` into the record with `id` and persist the collection.
    ///
    /// Returns the updated record, or `None` if no record has `id`. The
    /// collection is rewritten either way.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the collection cannot be
    /// written.
    pub fn update(&self, id: &E::Id, patch: E::Patch) -> Result<Option<E>, StoreError> {
        let mut records = self.list()?;
        let mut updated = None;

        if let Some(record) = records.iter_mut().find(|record| record.id() == id) {
            record.apply(patch)?;
            updated = Some(record.clone());
        }

        self.write(&records)?;
        match &updated {
            Some(_) => info!(key = E::KEY, %id, "updated record"),
            None => debug!(key = E::KEY, %id, "update matched no record"),
        }
        Ok(updated)
    }

    /// Drop the record with `id` and persist the collection.
    ///
    /// Returns whether a record was removed. The collection is rewritten
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the collection cannot be
    /// written.
    pub fn remove(&self, id: &E::Id) -> Result<bool, StoreError> {
        let mut records = self.list()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        let removed = records.len() != before;

        self.write(&records)?;
        if removed {
            info!(key = E::KEY, %id, "deleted record");
        } else {
            debug!(key = E::KEY, %id, "delete matched no record");
        }
        Ok(removed)
    }

    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        self.storage
            .get(E::KEY)
            .map_err(|source| StoreError::Unavailable { key: E::KEY, source })
    }

    fn decode(&self, raw: &str) -> Result<Vec<E>, StoreError> {
        match serde_json::from_str::<Vec<E>>(raw) {
            Ok(records) => {
                debug!(key = E::KEY, count = records.len(), "loaded collection");
                Ok(records)
            }
            Err(source) => match self.recovery {
                RecoveryPolicy::Fail => Err(StoreError::MalformedState { key: E::KEY, source }),
                RecoveryPolicy::Reseed => {
                    warn!(key = E::KEY, error = %source, "dropping malformed collection and reseeding");
                    self.reseed()
                }
            },
        }
    }

    fn reseed(&self) -> Result<Vec<E>, StoreError> {
        let records = E::seed(Utc::now())?;
        self.write(&records)?;
        Ok(records)
    }

    fn write(&self, records: &[E]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records)
            .map_err(|source| StoreError::Encode { key: E::KEY, source })?;
        self.storage
            .set(E::KEY, &raw)
            .map_err(|source| StoreError::Persistence { key: E::KEY, source })?;
        debug!(key = E::KEY, count = records.len(), bytes = raw.len(), "persisted collection");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::storage::MemoryStorage;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
        pinned: bool,
    }

    #[derive(Default)]
    struct NotePatch {
        text: Option<String>,
        pinned: Option<bool>,
    }

    impl Entity for Note {
        type Id = String;
        type Draft = String;
        type Patch = NotePatch;

        const KEY: &'static str = "notes";

        fn id(&self) -> &String {
            &self.id
        }

        fn from_draft(text: String, now: DateTime<Utc>) -> Result<Self, StoreError> {
            Ok(Self {
                id: now.timestamp_nanos_opt().unwrap_or_default().to_string(),
                text,
                pinned: false,
            })
        }

        fn apply(&mut self, patch: NotePatch) -> Result<(), StoreError> {
            if let Some(text) = patch.text {
                self.text = text;
            }
            if let Some(pinned) = patch.pinned {
                self.pinned = pinned;
            }
            Ok(())
        }

        fn seed(_now: DateTime<Utc>) -> Result<Vec<Self>, StoreError> {
            Ok(vec![Self {
                id: "1".to_owned(),
                text: "welcome".to_owned(),
                pinned: true,
            }])
        }
    }

    fn store_with(policy: RecoveryPolicy) -> (Arc<MemoryStorage>, EntityStore<Note>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = EntityStore::new(storage.clone(), policy);
        (storage, store)
    }

    #[test]
    fn test_initialize_seeds_once() {
        let (storage, store) = store_with(RecoveryPolicy::Reseed);

        let seeded = store.initialize().unwrap();
        assert_eq!(seeded.len(), 1);
        assert!(storage.get("notes").unwrap().is_some());

        store.remove(&"1".to_owned()).unwrap();
        assert!(store.initialize().unwrap().is_empty());
    }

    #[test]
    fn test_list_before_initialize_is_empty() {
        let (_, store) = store_with(RecoveryPolicy::Reseed);
        assert!(store.list().unwrap().is_empty());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let (_, store) = store_with(RecoveryPolicy::Reseed);
        store.initialize().unwrap();

        let patch = NotePatch {
            text: Some("edited".to_owned()),
            ..NotePatch::default()
        };
        let updated = store.update(&"1".to_owned(), patch).unwrap().unwrap();

        assert_eq!(updated.id, "1");
        assert_eq!(updated.text, "edited");
        assert!(updated.pinned);
    }

    #[test]
    fn test_update_unknown_id_rewrites_unchanged() {
        let (storage, store) = store_with(RecoveryPolicy::Reseed);
        store.initialize().unwrap();
        let before = storage.get("notes").unwrap();

        let result = store.update(&"missing".to_owned(), NotePatch::default()).unwrap();

        assert!(result.is_none());
        assert_eq!(storage.get("notes").unwrap(), before);
    }

    #[test]
    fn test_remove_unknown_id_is_not_an_error() {
        let (_, store) = store_with(RecoveryPolicy::Reseed);
        store.initialize().unwrap();

        assert!(!store.remove(&"missing".to_owned()).unwrap());
        assert_eq!(store.find_by_id(&"missing".to_owned()).unwrap(), None);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_create_appends_in_order() {
        let (_, store) = store_with(RecoveryPolicy::Reseed);
        store.initialize().unwrap();

        let created = store.create("second".to_owned()).unwrap();
        let all = store.list().unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all.last(), Some(&created));
        assert_eq!(store.find_by_id(&created.id).unwrap(), Some(created));
    }

    #[test]
    fn test_malformed_state_reseeds_by_default() {
        let (storage, store) = store_with(RecoveryPolicy::Reseed);
        storage.set("notes", "{not json").unwrap();

        let records = store.initialize().unwrap();

        assert_eq!(records.len(), 1);
        let raw = storage.get("notes").unwrap().unwrap();
        assert!(serde_json::from_str::<Vec<Note>>(&raw).is_ok());
    }

    #[test]
    fn test_malformed_state_fails_when_configured() {
        let (storage, store) = store_with(RecoveryPolicy::Fail);
        storage.set("notes", "{not json").unwrap();

        let err = store.list().unwrap_err();

        assert!(matches!(err, StoreError::MalformedState { key: "notes", .. }));
        assert_eq!(storage.get("notes").unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_write_failure_surfaces_persistence_error() {
        let storage = Arc::new(MemoryStorage::with_quota(64));
        let store: EntityStore<Note> = EntityStore::new(storage.clone(), RecoveryPolicy::Reseed);
        store.initialize().unwrap();

        let err = store.create("x".repeat(128)).unwrap_err();

        assert!(matches!(err, StoreError::Persistence { key: "notes", .. }));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_recovery_policy_parse() {
        assert_eq!("Reseed".parse(), Ok(RecoveryPolicy::Reseed));
        assert_eq!("fail".parse(), Ok(RecoveryPolicy::Fail));
        assert!("ignore".parse::<RecoveryPolicy>().is_err());
    }
}
