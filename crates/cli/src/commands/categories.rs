//! Category commands.

use ihuza_core::{CategoryId, CategoryPatch, Inventory, NewCategory, View};

use super::{CliError, print_json, require};

pub fn list(inventory: &Inventory) -> Result<(), CliError> {
    require(inventory, View::Categories)?;
    print_json(&inventory.categories.list()?)
}

pub fn show(inventory: &Inventory, id: &CategoryId) -> Result<(), CliError> {
    require(inventory, View::Categories)?;
    let category = inventory
        .categories
        .find_by_id(id)?
        .ok_or_else(|| not_found(id))?;
    print_json(&category)
}

pub fn add(inventory: &Inventory, draft: NewCategory) -> Result<(), CliError> {
    require(inventory, View::Categories)?;
    print_json(&inventory.categories.create(draft)?)
}

pub fn update(
    inventory: &Inventory,
    id: &CategoryId,
    patch: CategoryPatch,
) -> Result<(), CliError> {
    require(inventory, View::Categories)?;
    let category = inventory
        .categories
        .update(id, patch)?
        .ok_or_else(|| not_found(id))?;
    print_json(&category)
}

/// Delete a category. Products keep the deleted category's name.
pub fn delete(inventory: &Inventory, id: &CategoryId) -> Result<(), CliError> {
    require(inventory, View::Categories)?;
    if !inventory.categories.remove(id)? {
        return Err(not_found(id));
    }
    tracing::info!(%id, "Category deleted");
    Ok(())
}

fn not_found(id: &CategoryId) -> CliError {
    CliError::NotFound {
        kind: "category",
        id: id.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use ihuza_core::{MemoryStorage, RecoveryPolicy};

    use super::*;

    #[test]
    fn test_add_and_delete_category() {
        let mut inventory =
            Inventory::open(Arc::new(MemoryStorage::new()), RecoveryPolicy::Reseed).unwrap();
        inventory.session.login("john@example.com", "user123").unwrap();

        add(
            &inventory,
            NewCategory {
                name: "Audio".to_string(),
                description: "Speakers".to_string(),
            },
        )
        .unwrap();
        let audio = inventory.categories.find_by_name("audio").unwrap().unwrap();
        assert_eq!(audio.product_count, 0);

        delete(&inventory, &audio.id).unwrap();
        assert!(matches!(
            delete(&inventory, &audio.id),
            Err(CliError::NotFound { kind: "category", .. })
        ));
        assert_eq!(inventory.categories.len().unwrap(), 3);
    }
}
