//! Composition root tying the stores to one storage backend.

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::dashboard::Overview;
use crate::guard::{self, Decision, NavItem, View};
use crate::models::{CategoryStore, ProductStore, UserStore};
use crate::storage::KeyValueStore;
use crate::store::{RecoveryPolicy, StoreError};

/// Every store of the dashboard, sharing one [`KeyValueStore`].
///
/// The stores hold no cached data, so the product, category and user stores
/// can be cloned out freely; the session store is owned here.
#[derive(Debug)]
pub struct Inventory {
    pub session: SessionStore,
    pub categories: CategoryStore,
    pub products: ProductStore,
    pub users: UserStore,
}

impl Inventory {
    /// Build all stores over `storage` and initialize them.
    ///
    /// Users are initialized before the session so the sample admin account
    /// exists by the time anyone can log in.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if storage cannot be read, sample data cannot
    /// be written, or a collection is malformed under
    /// [`RecoveryPolicy::Fail`].
    pub fn open(
        storage: Arc<dyn KeyValueStore>,
        recovery: RecoveryPolicy,
    ) -> Result<Self, StoreError> {
        let users = UserStore::new(Arc::clone(&storage), recovery);
        let categories = CategoryStore::new(Arc::clone(&storage), recovery);
        let products = ProductStore::new(Arc::clone(&storage), recovery);

        users.initialize()?;
        categories.initialize()?;
        products.initialize()?;

        let mut session = SessionStore::new(storage, users.clone());
        session.initialize()?;

        Ok(Self {
            session,
            categories,
            products,
            users,
        })
    }

    /// Access decision for `view` in the current session.
    #[must_use]
    pub fn authorize(&self, view: View) -> Decision {
        guard::authorize(view, self.session.state())
    }

    /// Sidebar entries for the signed-in principal.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        guard::navigation(self.session.current())
    }

    /// Dashboard figures.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if a collection cannot be read.
    pub fn overview(&self) -> Result<Overview, StoreError> {
        Ok(Overview::compute(&self.products.list()?, &self.users.list()?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, keys};

    #[test]
    fn test_open_seeds_every_collection() {
        let storage = Arc::new(MemoryStorage::new());
        let inventory = Inventory::open(storage.clone(), RecoveryPolicy::Reseed).unwrap();

        for key in [keys::USERS, keys::CATEGORIES, keys::PRODUCTS] {
            assert!(storage.get(key).unwrap().is_some(), "{key} not seeded");
        }
        assert_eq!(storage.get(keys::CURRENT_USER).unwrap(), None);
        assert_eq!(inventory.authorize(View::Dashboard), Decision::Redirect(View::Login));
    }

    #[test]
    fn test_registration_is_visible_to_user_store() {
        let storage = Arc::new(MemoryStorage::new());
        let mut inventory = Inventory::open(storage, RecoveryPolicy::Reseed).unwrap();

        inventory
            .session
            .register("new@huza.com", "pw-123456", crate::Role::User)
            .unwrap();

        assert_eq!(inventory.users.len().unwrap(), 3);
        assert_eq!(inventory.overview().unwrap().total_users, 3);
        assert_eq!(inventory.authorize(View::Users), Decision::Redirect(View::Dashboard));
        assert_eq!(inventory.navigation().len(), 3);
    }

    #[test]
    fn test_open_fails_on_corrupt_data_when_configured() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::PRODUCTS, "not json").unwrap();

        let err = Inventory::open(storage, RecoveryPolicy::Fail).unwrap_err();

        assert!(matches!(err, StoreError::MalformedState { key: keys::PRODUCTS, .. }));
    }
}
