//! Integration tests for view access per session.

#![allow(clippy::unwrap_used)]

use ihuza_core::RecoveryPolicy::Reseed;
use ihuza_core::{Decision, Role, View};
use ihuza_integration_tests::TestContext;

#[test]
fn test_signed_out_session() {
    let ctx = TestContext::new().unwrap();
    let inventory = ctx.open(Reseed).unwrap();

    assert_eq!(inventory.authorize(View::Login), Decision::Allow);
    assert_eq!(inventory.authorize(View::Register), Decision::Allow);
    for view in [View::Dashboard, View::Products, View::Categories, View::Users] {
        assert_eq!(inventory.authorize(view), Decision::Redirect(View::Login));
    }
    assert!(inventory.navigation().is_empty());
}

#[test]
fn test_user_session() {
    let ctx = TestContext::new().unwrap();
    let mut inventory = ctx.open(Reseed).unwrap();
    inventory.session.login("john@example.com", "user123").unwrap();

    assert_eq!(inventory.authorize(View::Login), Decision::Allow);
    assert_eq!(inventory.authorize(View::Products), Decision::Allow);
    assert_eq!(inventory.authorize(View::Users), Decision::Redirect(View::Dashboard));

    let titles: Vec<_> = inventory.navigation().iter().map(|item| item.title).collect();
    assert_eq!(titles, ["Dashboard", "Products", "Categories"]);
}

#[test]
fn test_admin_session_after_restart() {
    let ctx = TestContext::new().unwrap();
    {
        let mut inventory = ctx.open(Reseed).unwrap();
        inventory
            .session
            .register("ops@huza.com", "ops-password", Role::Admin)
            .unwrap();
    }

    let inventory = ctx.open(Reseed).unwrap();

    assert_eq!(inventory.authorize(View::Users), Decision::Allow);
    assert_eq!(inventory.navigation().len(), 4);
}

#[test]
fn test_logout_closes_every_protected_view() {
    let ctx = TestContext::new().unwrap();
    let mut inventory = ctx.open(Reseed).unwrap();
    inventory.session.login("admin@huza.com", "admin123").unwrap();
    inventory.session.logout().unwrap();

    assert_eq!(inventory.authorize(View::Users), Decision::Redirect(View::Login));
    assert_eq!(View::from_path("/nowhere"), View::Dashboard);
}
