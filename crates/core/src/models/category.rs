//! Product categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Entity, EntityStore, StoreError};
use crate::storage::keys;
use crate::types::CategoryId;

/// A product category.
///
/// `product_count` is a denormalized counter: it is set from the sample data
/// (and to zero on creation) and is never recomputed when products are
/// added, moved or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_count: u32,
}

/// Input for creating a category.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

/// Partial update for a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Manual correction of the stored counter.
    pub product_count: Option<u32>,
}

impl Entity for Category {
    type Id = CategoryId;
    type Draft = NewCategory;
    type Patch = CategoryPatch;

    const KEY: &'static str = keys::CATEGORIES;

    fn id(&self) -> &CategoryId {
        &self.id
    }

    fn from_draft(draft: NewCategory, _now: DateTime<Utc>) -> Result<Self, StoreError> {
        Ok(Self {
            id: CategoryId::generate(),
            name: draft.name,
            description: draft.description,
            product_count: 0,
        })
    }

    fn apply(&mut self, patch: CategoryPatch) -> Result<(), StoreError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(product_count) = patch.product_count {
            self.product_count = product_count;
        }
        Ok(())
    }

    fn seed(_now: DateTime<Utc>) -> Result<Vec<Self>, StoreError> {
        let category = |id: &str, name: &str, description: &str, product_count| Self {
            id: CategoryId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            product_count,
        };

        Ok(vec![
            category("1", "Laptop", "Portable computers", 2),
            category("2", "Tablet", "Tablet devices", 2),
            category("3", "Mobile", "Mobile phones", 1),
        ])
    }
}

/// Store for the `categories` collection.
pub type CategoryStore = EntityStore<Category>;

impl EntityStore<Category> {
    /// First category whose name equals `name`, ignoring case.
    ///
    /// Products reference categories by name, so this is how a product's
    /// category is resolved.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if storage cannot be read or decoded.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|category| category.name.eq_ignore_ascii_case(name.trim())))
    }
}
