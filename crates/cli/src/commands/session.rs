//! Sign-in state commands.

use ihuza_core::{Inventory, Role};
use secrecy::{ExposeSecret, SecretString};

use super::{CliError, print_json};

/// Create an account and sign in as it.
pub fn register(
    inventory: &mut Inventory,
    email: &str,
    password: &SecretString,
    role: Role,
) -> Result<(), CliError> {
    let principal = inventory
        .session
        .register(email, password.expose_secret(), role)?;
    tracing::info!("Welcome, {}", principal.greeting_name());
    print_json(&principal)
}

/// Sign in with an existing account.
pub fn login(
    inventory: &mut Inventory,
    email: &str,
    password: &SecretString,
) -> Result<(), CliError> {
    let principal = inventory.session.login(email, password.expose_secret())?;
    tracing::info!("Welcome back, {}", principal.greeting_name());
    print_json(&principal)
}

/// Sign out. Succeeds when nobody is signed in.
pub fn logout(inventory: &mut Inventory) -> Result<(), CliError> {
    inventory.session.logout()?;
    tracing::info!("Signed out");
    Ok(())
}

/// Print the signed-in account.
pub fn whoami(inventory: &Inventory) -> Result<(), CliError> {
    let principal = inventory.session.current().ok_or(CliError::NotSignedIn)?;
    print_json(principal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use ihuza_core::{AuthError, MemoryStorage, RecoveryPolicy};

    use super::*;

    #[test]
    fn test_login_then_logout() {
        let mut inventory =
            Inventory::open(Arc::new(MemoryStorage::new()), RecoveryPolicy::Reseed).unwrap();

        login(&mut inventory, "ADMIN@huza.com", &SecretString::from("admin123".to_owned())).unwrap();
        assert!(inventory.session.is_admin());
        assert!(whoami(&inventory).is_ok());

        logout(&mut inventory).unwrap();
        assert!(matches!(whoami(&inventory), Err(CliError::NotSignedIn)));
        logout(&mut inventory).unwrap();
    }

    #[test]
    fn test_login_with_wrong_password() {
        let mut inventory =
            Inventory::open(Arc::new(MemoryStorage::new()), RecoveryPolicy::Reseed).unwrap();

        let err = login(&mut inventory, "admin@huza.com", &SecretString::from("nope".to_owned())).unwrap_err();

        assert!(matches!(err, CliError::Auth(AuthError::InvalidCredentials)));
        assert!(!inventory.session.is_authenticated());
    }
}
