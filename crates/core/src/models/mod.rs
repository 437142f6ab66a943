//! Domain records and their stores.
//!
//! Each record type implements [`Entity`](crate::store::Entity) and gets a
//! store alias:
//!
//! - [`CategoryStore`] - `categories`
//! - [`ProductStore`] - `products`, plus [`search`](crate::store::EntityStore::search)
//! - [`UserStore`] - `users`, shared with the session store's registration

pub mod category;
pub mod product;
pub mod user;

pub use category::{Category, CategoryPatch, CategoryStore, NewCategory};
pub use product::{NewProduct, Product, ProductPatch, ProductStore};
pub use user::{NEVER_LOGGED_IN, NewUser, UserPatch, UserProfile, UserRecord, UserStore};
