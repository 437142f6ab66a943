//! Command implementations.
//!
//! Every command that reads or changes dashboard data first asks the access
//! guard for the matching view, so the CLI enforces the same rules as the
//! web sidebar.

pub mod categories;
pub mod dashboard;
pub mod products;
pub mod session;
pub mod users;

use ihuza_core::{AuthError, Decision, Inventory, StorageError, StoreError, View};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The view needs a signed-in account.
    #[error("not signed in; run `ihuza login` first")]
    NotSignedIn,

    /// The view needs an admin account.
    #[error("{0} requires an admin account")]
    Forbidden(&'static str),

    /// The session has not been restored yet.
    #[error("session is still loading")]
    SessionLoading,

    /// No record with the given id.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Registration or login failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The data directory could not be opened.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Fail unless the current session may open `view`.
pub fn require(inventory: &Inventory, view: View) -> Result<(), CliError> {
    match inventory.authorize(view) {
        Decision::Allow => Ok(()),
        Decision::Pending => Err(CliError::SessionLoading),
        Decision::Redirect(View::Login) => Err(CliError::NotSignedIn),
        Decision::Redirect(_) => Err(CliError::Forbidden(view.title())),
    }
}

/// Print `value` to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
