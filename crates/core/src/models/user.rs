//! User accounts.
//!
//! Self-registered credentials and admin-managed users share one record type
//! and one storage key (`users`). Registration fills in only the credential
//! fields; the admin screens add a display name, an account status and a
//! last-login label.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, is_hashed, verify_password};
use crate::store::{Entity, EntityStore, StoreError};
use crate::storage::keys;
use crate::types::{AccountStatus, Email, Role, UserId};

/// Label stored in `last_login` for accounts that never signed in.
pub const NEVER_LOGGED_IN: &str = "Never";

/// A stored user account, including its password material.
///
/// `password` holds an argon2 PHC string, or the verbatim password for
/// records written before hashing was introduced. It never leaves this crate
/// in a [`Principal`](crate::auth::Principal) or a [`UserProfile`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: Email,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("status", &self.status)
            .field("last_login", &self.last_login)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl UserRecord {
    /// Build a self-registered credential (no name, status or last login).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PasswordHash`] if hashing fails.
    pub fn credential(
        email: Email,
        password: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            id: UserId::generate(),
            name: None,
            email,
            password: hash_password(password).map_err(|_| StoreError::PasswordHash)?,
            role,
            status: None,
            last_login: None,
            created_at: now,
        })
    }

    /// Password-free view of the record.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            status: self.status,
            last_login: self.last_login.clone(),
            created_at: self.created_at,
        }
    }
}

/// A user account without password material, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: Email,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for an admin creating a user.
#[derive(Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub role: Role,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Partial update for a user. A new password is hashed before storing.
#[derive(Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
    pub last_login: Option<String>,
}

impl std::fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPatch")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .field("status", &self.status)
            .field("last_login", &self.last_login)
            .finish()
    }
}

impl Entity for UserRecord {
    type Id = UserId;
    type Draft = NewUser;
    type Patch = UserPatch;

    const KEY: &'static str = keys::USERS;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn from_draft(draft: NewUser, now: DateTime<Utc>) -> Result<Self, StoreError> {
        let mut record = Self::credential(draft.email, &draft.password, draft.role, now)?;
        record.name = Some(draft.name);
        record.status = Some(AccountStatus::Active);
        record.last_login = Some(NEVER_LOGGED_IN.to_owned());
        Ok(record)
    }

    fn apply(&mut self, patch: UserPatch) -> Result<(), StoreError> {
        // Same password again keeps the stored hash, so a repeated patch
        // yields the same record.
        if let Some(password) = patch.password
            && !(is_hashed(&self.password) && verify_password(&password, &self.password))
        {
            self.password = hash_password(&password).map_err(|_| StoreError::PasswordHash)?;
        }
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(status) = patch.status {
            self.status = Some(status);
        }
        if let Some(last_login) = patch.last_login {
            self.last_login = Some(last_login);
        }
        Ok(())
    }

    fn seed(now: DateTime<Utc>) -> Result<Vec<Self>, StoreError> {
        let seeded = |id: &str,
                      name: &str,
                      email: &str,
                      password: &str,
                      role: Role,
                      last_login: &str|
         -> Result<Self, StoreError> {
            Ok(Self {
                id: UserId::new(id),
                name: Some(name.to_owned()),
                email: Email::trusted(email),
                password: hash_password(password).map_err(|_| StoreError::PasswordHash)?,
                role,
                status: Some(AccountStatus::Active),
                last_login: Some(last_login.to_owned()),
                created_at: now,
            })
        };

        Ok(vec![
            seeded("1", "Admin User", "admin@huza.com", "admin123", Role::Admin, "2 hours ago")?,
            seeded("2", "John Doe", "john@example.com", "user123", Role::User, "5 hours ago")?,
        ])
    }
}

/// Store for the `users` collection, as seen by the user management screen.
pub type UserStore = EntityStore<UserRecord>;

impl EntityStore<UserRecord> {
    /// Password-free listing of every account.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if storage cannot be read or decoded.
    pub fn profiles(&self) -> Result<Vec<UserProfile>, StoreError> {
        Ok(self.list()?.iter().map(UserRecord::profile).collect())
    }

    /// First account whose email matches `email`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if storage cannot be read or decoded.
    pub fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|user| user.email.matches(email)))
    }
}
