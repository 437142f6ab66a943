//! Figures shown on the dashboard landing page.

use serde::Serialize;

use crate::models::{Product, UserProfile, UserRecord};
use crate::types::ProductStatus;

/// Products shown under "Recently added".
pub const RECENT_PRODUCTS: usize = 4;

/// Users shown in the users panel.
pub const LISTED_USERS: usize = 5;

/// Aggregates over the product and user collections.
///
/// "Assigned" and "unassigned" are the dashboard's names for products marked
/// In Stock and Out of Stock; Low Stock products count towards neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_users: usize,
    pub total_products: usize,
    pub assigned_products: usize,
    pub unassigned_products: usize,
    /// First products in collection order.
    pub recent_products: Vec<Product>,
    /// First users in collection order.
    pub users: Vec<UserProfile>,
}

impl Overview {
    /// Compute the overview. Inputs are not modified.
    #[must_use]
    pub fn compute(products: &[Product], users: &[UserRecord]) -> Self {
        let with_status =
            |status: ProductStatus| products.iter().filter(|p| p.status == status).count();

        Self {
            total_users: users.len(),
            total_products: products.len(),
            assigned_products: with_status(ProductStatus::InStock),
            unassigned_products: with_status(ProductStatus::OutOfStock),
            recent_products: products.iter().take(RECENT_PRODUCTS).cloned().collect(),
            users: users.iter().take(LISTED_USERS).map(UserRecord::profile).collect(),
        }
    }
}
