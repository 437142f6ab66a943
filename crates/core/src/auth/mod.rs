//! Authentication and the signed-in session.
//!
//! [`SessionStore`] holds at most one [`Principal`] and mirrors it to the
//! `currentUser` storage key so a restarted process comes back signed in.
//! Registration and login read the shared `users` collection through a
//! [`UserStore`]; the same records are what the user management screen edits.
//!
//! The session starts in [`SessionState::Loading`] and only becomes
//! [`SessionState::Ready`] after [`SessionStore::initialize`], so access
//! decisions are deferred until the persisted principal has been read.

mod error;
pub mod password;

pub use error::AuthError;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::{UserRecord, UserStore};
use crate::storage::{KeyValueStore, keys};
use crate::store::StoreError;
use crate::types::{Email, Role, UserId};

use password::verify_password;

/// The signed-in account, without password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Principal {
    /// Whether the principal has the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name shown in the "Welcome back" greeting: the email's local part.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.email.local_part()
    }
}

impl From<&UserRecord> for Principal {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
            created_at: Some(user.created_at),
        }
    }
}

/// Session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The persisted principal has not been read yet.
    #[default]
    Loading,
    /// Initialized; `None` when signed out.
    Ready(Option<Principal>),
}

impl SessionState {
    /// The signed-in principal, if initialized and signed in.
    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Ready(principal) => principal.as_ref(),
            Self::Loading => None,
        }
    }
}

/// Holds the signed-in principal.
#[derive(Debug)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    users: UserStore,
    state: SessionState,
}

impl SessionStore {
    /// Create a session over `storage`, reading credentials from `users`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, users: UserStore) -> Self {
        Self {
            storage,
            users,
            state: SessionState::Loading,
        }
    }

    /// Restore the persisted principal.
    ///
    /// A `currentUser` entry that does not decode is discarded and the
    /// session starts signed out.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if storage cannot be read.
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        let raw = self
            .storage
            .get(keys::CURRENT_USER)
            .map_err(|source| StoreError::Unavailable {
                key: keys::CURRENT_USER,
                source,
            })?;

        let principal = raw.and_then(|raw| match serde_json::from_str::<Principal>(&raw) {
            Ok(principal) => Some(principal),
            Err(e) => {
                warn!(error = %e, "discarding malformed persisted session");
                if let Err(e) = self.storage.remove(keys::CURRENT_USER) {
                    warn!(error = %e, "failed to clear malformed session");
                }
                None
            }
        });

        if let Some(principal) = &principal {
            info!(email = %principal.email, role = %principal.role, "restored session");
        }
        self.state = SessionState::Ready(principal);
        Ok(())
    }

    /// Create an account and sign it in.
    ///
    /// The email must be well formed and not already registered (compared
    /// ignoring case). The password is stored hashed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed,
    /// `AuthError::DuplicateEmail` if it is already registered (the user
    /// collection is left unchanged), or `AuthError::Store` if storage fails.
    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Principal, AuthError> {
        let email = Email::parse(email)?;

        if self.users.find_by_email(email.as_str())?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let record = UserRecord::credential(email, password, role, Utc::now())?;
        let record = self.users.insert(record)?;
        info!(email = %record.email, role = %record.role, "registered user");

        self.activate(Principal::from(&record))
    }

    /// Sign in with an existing account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account matches both the
    /// email (ignoring case) and the password, or `AuthError::Store` if
    /// storage fails.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let user = self
            .users
            .list()?
            .into_iter()
            .find(|user| user.email.matches(email) && verify_password(password, &user.password))
            .ok_or(AuthError::InvalidCredentials)?;

        info!(email = %user.email, "user logged in");
        self.activate(Principal::from(&user))
    }

    /// Sign out. Signing out twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the persisted entry cannot be
    /// removed; the in-memory session is signed out regardless.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        if let Some(principal) = self.state.principal() {
            info!(email = %principal.email, "user logged out");
        }
        self.state = SessionState::Ready(None);
        self.storage
            .remove(keys::CURRENT_USER)
            .map_err(|source| StoreError::Persistence {
                key: keys::CURRENT_USER,
                source,
            })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The signed-in principal.
    #[must_use]
    pub const fn current(&self) -> Option<&Principal> {
        self.state.principal()
    }

    /// Whether [`initialize`](Self::initialize) has not completed yet.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading)
    }

    /// Whether someone is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Whether the signed-in principal is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current().is_some_and(Principal::is_admin)
    }

    /// Set the active principal, then persist it.
    ///
    /// If persisting fails the principal stays active in memory and the
    /// error is returned.
    fn activate(&mut self, principal: Principal) -> Result<Principal, AuthError> {
        self.state = SessionState::Ready(Some(principal.clone()));

        let raw = serde_json::to_string(&principal).map_err(|source| StoreError::Encode {
            key: keys::CURRENT_USER,
            source,
        })?;
        self.storage
            .set(keys::CURRENT_USER, &raw)
            .map_err(|source| StoreError::Persistence {
                key: keys::CURRENT_USER,
                source,
            })?;

        Ok(principal)
    }
}
