//! iHUZA Core - session, catalog and user stores for the inventory dashboard.
//!
//! This crate holds everything behind the dashboard screens: the record
//! types, the stores that keep them, the signed-in session, and the access
//! rules for each view. Presentation lives elsewhere (see `ihuza-cli`).
//!
//! # Architecture
//!
//! All persistence goes through one [`KeyValueStore`], mirroring the
//! browser `localStorage` the web dashboard used: each collection is a JSON
//! array under its own key, read and rewritten whole on every change. There
//! is no global state; [`Inventory`] builds and owns one instance of every
//! store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, roles and statuses
//! - [`storage`] - The key-value boundary and its memory/file backends
//! - [`store`] - Generic whole-collection CRUD store
//! - [`models`] - Categories, products and users
//! - [`auth`] - Registration, login and the persisted session
//! - [`guard`] - Which views a session may open
//! - [`dashboard`] - Landing page figures
//! - [`inventory`] - Composition root

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod dashboard;
pub mod guard;
pub mod inventory;
pub mod models;
pub mod storage;
pub mod store;
pub mod types;

pub use auth::{AuthError, Principal, SessionState, SessionStore};
pub use dashboard::Overview;
pub use guard::{Decision, NavItem, Requirement, View};
pub use inventory::Inventory;
pub use models::*;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use store::{Entity, EntityStore, RecoveryPolicy, StoreError};
pub use types::*;
