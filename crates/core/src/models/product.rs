//! Inventory products.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::{Entity, EntityStore, StoreError};
use crate::storage::keys;
use crate::types::date::added_date;
use crate::types::{ProductId, ProductStatus, parse_added_date};

/// A product in the inventory.
///
/// `category` holds the category *name*, not its id; renaming or deleting a
/// category leaves products pointing at the old name. `status` is whatever
/// the operator last chose and is not derived from `stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub sku: String,
    pub price: Decimal,
    pub stock: u32,
    pub status: ProductStatus,
    #[serde(with = "added_date")]
    pub added_date: NaiveDate,
}

impl Product {
    /// Case-insensitive substring match on name, SKU and category.
    ///
    /// `needle` must already be lower-cased.
    fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.sku, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub sku: String,
    pub price: Decimal,
    pub stock: u32,
    pub status: ProductStatus,
}

/// Partial update for a product.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub status: Option<ProductStatus>,
}

impl Entity for Product {
    type Id = ProductId;
    type Draft = NewProduct;
    type Patch = ProductPatch;

    const KEY: &'static str = keys::PRODUCTS;

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn from_draft(draft: NewProduct, now: DateTime<Utc>) -> Result<Self, StoreError> {
        Ok(Self {
            id: ProductId::generate(),
            name: draft.name,
            category: draft.category,
            sku: draft.sku,
            price: draft.price,
            stock: draft.stock,
            status: draft.status,
            added_date: now.date_naive(),
        })
    }

    fn apply(&mut self, patch: ProductPatch) -> Result<(), StoreError> {
        let ProductPatch {
            name,
            category,
            sku,
            price,
            stock,
            status,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(sku) = sku {
            self.sku = sku;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(stock) = stock {
            self.stock = stock;
        }
        if let Some(status) = status {
            self.status = status;
        }
        Ok(())
    }

    fn seed(_now: DateTime<Utc>) -> Result<Vec<Self>, StoreError> {
        let rows = [
            ("1", "Macbook Pro 16\"", "Laptop", "MB-001", 2499_i64, 15, ProductStatus::InStock, "Jan 15, 2024"),
            ("2", "Dell XPS 13", "Laptop", "DL-002", 1299, 8, ProductStatus::InStock, "Jan 10, 2024"),
            ("3", "iPad Air", "Tablet", "IP-003", 599, 25, ProductStatus::InStock, "Jan 5, 2024"),
            ("4", "Surface Pro 9", "Tablet", "SF-004", 999, 0, ProductStatus::OutOfStock, "Dec 28, 2023"),
            ("5", "iPhone 15 Pro", "Mobile", "IP-005", 1099, 45, ProductStatus::LowStock, "Dec 20, 2023"),
        ];

        rows.into_iter()
            .map(|(id, name, category, sku, price, stock, status, added)| -> Result<Self, StoreError> {
                let added_date =
                    parse_added_date(added).map_err(|e| StoreError::InvalidSeed {
                        key: keys::PRODUCTS,
                        reason: format!("addedDate {added:?} of product {id}: {e}"),
                    })?;
                Ok(Self {
                    id: ProductId::new(id),
                    name: name.to_owned(),
                    category: category.to_owned(),
                    sku: sku.to_owned(),
                    price: Decimal::from(price),
                    stock,
                    status,
                    added_date,
                })
            })
            .collect()
    }
}

/// Store for the `products` collection.
pub type ProductStore = EntityStore<Product>;

impl EntityStore<Product> {
    /// Products whose name, SKU or category contains `query`, ignoring case.
    ///
    /// `None` or an empty query returns every product. Order is preserved.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if storage cannot be read or decoded.
    pub fn search(&self, query: Option<&str>) -> Result<Vec<Product>, StoreError> {
        let products = self.list()?;
        let Some(query) = query.filter(|q| !q.is_empty()) else {
            return Ok(products);
        };

        let needle = query.to_lowercase();
        Ok(products
            .into_iter()
            .filter(|product| product.matches(&needle))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStorage};
    use crate::store::RecoveryPolicy;

    fn store() -> ProductStore {
        let store = ProductStore::new(Arc::new(MemoryStorage::new()), RecoveryPolicy::Reseed);
        store.initialize().unwrap();
        store
    }

    fn speaker() -> NewProduct {
        NewProduct {
            name: "Speaker".to_owned(),
            category: "Audio".to_owned(),
            sku: "SPK-1".to_owned(),
            price: Decimal::new(99, 0),
            stock: 10,
            status: ProductStatus::InStock,
        }
    }

    #[test]
    fn test_seed_has_five_products() {
        let products = store().list().unwrap();
        assert_eq!(products.len(), 5);
        assert_eq!(
            products.iter().map(|p| p.sku.as_str()).collect::<Vec<_>>(),
            ["MB-001", "DL-002", "IP-003", "SF-004", "IP-005"]
        );
    }

    #[test]
    fn test_seed_parses_every_added_date() {
        let products = Product::seed(Utc::now()).unwrap();

        assert_eq!(products.len(), 5);
        assert_eq!(
            products.last().map(|p| p.added_date),
            NaiveDate::from_ymd_opt(2023, 12, 20)
        );
    }

    #[test]
    fn test_create_stamps_id_and_added_date() {
        let store = store();
        let created = store.create(speaker()).unwrap();

        assert!(!created.id.as_str().is_empty());
        assert_eq!(created.added_date, Utc::now().date_naive());
        assert_eq!(store.len().unwrap(), 6);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let store = store();
        store.create(speaker()).unwrap();

        let by_sku = store.search(Some("spk")).unwrap();
        assert_eq!(by_sku.len(), 1);
        assert_eq!(by_sku.first().map(|p| p.name.as_str()), Some("Speaker"));

        let by_category = store.search(Some("TABLET")).unwrap();
        assert_eq!(by_category.len(), 2);

        let by_name = store.search(Some("xps")).unwrap();
        assert_eq!(by_name.len(), 1);
    }

    #[test]
    fn test_empty_search_returns_everything_in_order() {
        let store = store();
        let all = store.list().unwrap();

        assert_eq!(store.search(None).unwrap(), all);
        assert_eq!(store.search(Some("")).unwrap(), all);
    }

    #[test]
    fn test_status_is_not_derived_from_stock() {
        let store = store();
        let id = ProductId::new("1");

        let updated = store
            .update(
                &id,
                ProductPatch {
                    stock: Some(0),
                    ..ProductPatch::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.stock, 0);
        assert_eq!(updated.status, ProductStatus::InStock);
    }

    #[test]
    fn test_reads_legacy_numeric_prices() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(
                keys::PRODUCTS,
                r#"[{"id":"1705312800000","name":"Pixel 8","category":"Mobile","sku":"PX-8",
                    "price":699.5,"stock":3,"status":"Low Stock","addedDate":"Feb 2, 2024"}]"#,
            )
            .unwrap();
        let store = ProductStore::new(storage, RecoveryPolicy::Fail);

        let pixel = store.list().unwrap().remove(0);

        assert_eq!(pixel.price, Decimal::new(6995, 1));
        assert_eq!(pixel.added_date, NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
    }

    #[test]
    fn test_added_date_persisted_in_table_format() {
        let product = store().find_by_id(&ProductId::new("3")).unwrap().unwrap();
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["addedDate"], "Jan 5, 2024");
        assert_eq!(json["status"], "In Stock");
    }
}
