//! Product catalog commands.

use ihuza_core::{Inventory, NewProduct, ProductId, ProductPatch, View};

use super::{CliError, print_json, require};

pub fn list(inventory: &Inventory) -> Result<(), CliError> {
    require(inventory, View::Products)?;
    print_json(&inventory.products.list()?)
}

pub fn search(inventory: &Inventory, query: Option<&str>) -> Result<(), CliError> {
    require(inventory, View::Products)?;
    let found = inventory.products.search(query)?;
    tracing::debug!(query, matches = found.len(), "product search");
    print_json(&found)
}

pub fn show(inventory: &Inventory, id: &ProductId) -> Result<(), CliError> {
    require(inventory, View::Products)?;
    let product = inventory
        .products
        .find_by_id(id)?
        .ok_or_else(|| not_found(id))?;
    print_json(&product)
}

pub fn add(inventory: &Inventory, draft: NewProduct) -> Result<(), CliError> {
    require(inventory, View::Products)?;
    warn_unknown_category(inventory, &draft.category)?;
    let product = inventory.products.create(draft)?;
    print_json(&product)
}

pub fn update(inventory: &Inventory, id: &ProductId, patch: ProductPatch) -> Result<(), CliError> {
    require(inventory, View::Products)?;
    if let Some(category) = &patch.category {
        warn_unknown_category(inventory, category)?;
    }
    let product = inventory
        .products
        .update(id, patch)?
        .ok_or_else(|| not_found(id))?;
    print_json(&product)
}

pub fn delete(inventory: &Inventory, id: &ProductId) -> Result<(), CliError> {
    require(inventory, View::Products)?;
    if !inventory.products.remove(id)? {
        return Err(not_found(id));
    }
    tracing::info!(%id, "Product deleted");
    Ok(())
}

/// Products reference categories by name and nothing enforces that the
/// name exists, so only warn.
fn warn_unknown_category(inventory: &Inventory, category: &str) -> Result<(), CliError> {
    if inventory.categories.find_by_name(category)?.is_none() {
        tracing::warn!(category, "no category with this name");
    }
    Ok(())
}

fn not_found(id: &ProductId) -> CliError {
    CliError::NotFound {
        kind: "product",
        id: id.to_string(),
    }
}
