//! Role and status enums.
//!
//! Serialized spellings match what the dashboard has always persisted, so
//! existing `users` and `products` blobs load unchanged.

use serde::{Deserialize, Serialize};

/// Account role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including user management.
    Admin,
    /// Access to the dashboard, products and categories.
    #[default]
    User,
}

impl Role {
    /// Returns the persisted spelling of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Operator-assigned stock status of a product.
///
/// Not derived from the stock count: a product with zero units can still be
/// marked "In Stock" until someone edits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductStatus {
    #[default]
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
}

impl ProductStatus {
    /// Returns the persisted (and displayed) label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out of Stock",
            Self::LowStock => "Low Stock",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    /// Accepts the display label or a kebab-case spelling (`in-stock`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "in stock" => Ok(Self::InStock),
            "out of stock" => Ok(Self::OutOfStock),
            "low stock" => Ok(Self::LowStock),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

/// Whether a managed user account is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Inactive => f.write_str("Inactive"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("invalid account status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_uses_display_labels_on_disk() {
        let json = serde_json::to_string(&ProductStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"Out of Stock\"");

        let parsed: ProductStatus = serde_json::from_str("\"Low Stock\"").unwrap();
        assert_eq!(parsed, ProductStatus::LowStock);
    }

    #[test]
    fn test_product_status_from_str_accepts_cli_spellings() {
        assert_eq!("In Stock".parse(), Ok(ProductStatus::InStock));
        assert_eq!("out-of-stock".parse(), Ok(ProductStatus::OutOfStock));
        assert_eq!("low_stock".parse(), Ok(ProductStatus::LowStock));
        assert!("sold".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!("user".parse(), Ok(Role::User));
        assert!("root".parse::<Role>().is_err());
    }
}
