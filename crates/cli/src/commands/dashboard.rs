//! Landing page commands.

use ihuza_core::{Inventory, View};

use super::{CliError, print_json, require};

/// Print the dashboard figures.
pub fn overview(inventory: &Inventory) -> Result<(), CliError> {
    require(inventory, View::Dashboard)?;
    if let Some(principal) = inventory.session.current() {
        tracing::info!("Welcome back, {}", principal.greeting_name());
    }
    print_json(&inventory.overview()?)
}

/// Print the sidebar entries. Signed-out sessions get an empty list.
pub fn nav(inventory: &Inventory) -> Result<(), CliError> {
    print_json(&inventory.navigation())
}
