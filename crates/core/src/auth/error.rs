//! Authentication error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] crate::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid email or password")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    DuplicateEmail,

    /// Reading or writing the user collection or session entry failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
