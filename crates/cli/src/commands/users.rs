//! User management commands. All of them need an admin account.

use ihuza_core::{AccountStatus, Email, Inventory, NewUser, Role, UserId, UserPatch, View};
use secrecy::{ExposeSecret, SecretString};

use super::{CliError, print_json, require};

/// Field changes for `users update`, with the password still secret.
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password: Option<SecretString>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

pub fn list(inventory: &Inventory) -> Result<(), CliError> {
    require(inventory, View::Users)?;
    print_json(&inventory.users.profiles()?)
}

pub fn show(inventory: &Inventory, id: &UserId) -> Result<(), CliError> {
    require(inventory, View::Users)?;
    let user = inventory
        .users
        .find_by_id(id)?
        .ok_or_else(|| not_found(id))?;
    print_json(&user.profile())
}

/// Add a user. Unlike `register`, an existing email is not rejected.
pub fn add(
    inventory: &Inventory,
    name: String,
    email: Email,
    password: &SecretString,
    role: Role,
) -> Result<(), CliError> {
    require(inventory, View::Users)?;
    let user = inventory.users.create(NewUser {
        name,
        email,
        password: password.expose_secret().to_owned(),
        role,
    })?;
    tracing::info!(email = %user.email, role = %user.role, "User created");
    print_json(&user.profile())
}

pub fn update(inventory: &Inventory, id: &UserId, changes: UserChanges) -> Result<(), CliError> {
    require(inventory, View::Users)?;
    let patch = UserPatch {
        name: changes.name,
        email: changes.email,
        password: changes
            .password
            .map(|password| password.expose_secret().to_owned()),
        role: changes.role,
        status: changes.status,
        last_login: None,
    };
    let user = inventory
        .users
        .update(id, patch)?
        .ok_or_else(|| not_found(id))?;
    print_json(&user.profile())
}

pub fn delete(inventory: &Inventory, id: &UserId) -> Result<(), CliError> {
    require(inventory, View::Users)?;
    if !inventory.users.remove(id)? {
        return Err(not_found(id));
    }
    tracing::info!(%id, "User deleted");
    Ok(())
}

fn not_found(id: &UserId) -> CliError {
    CliError::NotFound {
        kind: "user",
        id: id.to_string(),
    }
}
