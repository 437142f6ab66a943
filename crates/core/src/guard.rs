//! Access decisions for dashboard views.
//!
//! The guard owns no state; it derives everything from the
//! [`SessionState`]. Presentation code asks [`authorize`] before building a
//! view and follows the returned [`Decision`].

use serde::Serialize;

use crate::auth::{Principal, SessionState};

/// A dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Register,
    Dashboard,
    Products,
    Categories,
    Users,
}

/// What a view requires of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone, signed in or not.
    Public,
    /// Any signed-in principal.
    Authenticated,
    /// A signed-in admin.
    Admin,
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the requested view.
    Allow,
    /// The session is still loading; decide again once it is ready.
    Pending,
    /// Show this view instead.
    Redirect(View),
}

impl View {
    /// Every view, in sidebar order after the public ones.
    pub const ALL: [Self; 6] = [
        Self::Login,
        Self::Register,
        Self::Dashboard,
        Self::Products,
        Self::Categories,
        Self::Users,
    ];

    /// Where a signed-in principal lands by default.
    pub const LANDING: Self = Self::Dashboard;

    /// Access requirement of the view.
    #[must_use]
    pub const fn requirement(self) -> Requirement {
        match self {
            Self::Login | Self::Register => Requirement::Public,
            Self::Dashboard | Self::Products | Self::Categories => Requirement::Authenticated,
            Self::Users => Requirement::Admin,
        }
    }

    /// Route path of the view.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Products => "/products",
            Self::Categories => "/categories",
            Self::Users => "/users",
        }
    }

    /// Sidebar label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Dashboard => "Dashboard",
            Self::Products => "Products",
            Self::Categories => "Categories",
            Self::Users => "Users",
        }
    }

    /// Resolve a route path. `/` and unknown paths land on the dashboard.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        Self::ALL
            .into_iter()
            .find(|view| view.path() == trimmed)
            .unwrap_or(Self::LANDING)
    }
}

/// Decide whether `view` may be shown in the current session.
#[must_use]
pub fn authorize(view: View, session: &SessionState) -> Decision {
    let principal = match session {
        SessionState::Loading => return Decision::Pending,
        SessionState::Ready(principal) => principal.as_ref(),
    };

    match (view.requirement(), principal) {
        (Requirement::Public, _) => Decision::Allow,
        (Requirement::Authenticated | Requirement::Admin, None) => Decision::Redirect(View::Login),
        (Requirement::Admin, Some(principal)) if !principal.is_admin() => {
            Decision::Redirect(View::LANDING)
        }
        (Requirement::Authenticated | Requirement::Admin, Some(_)) => Decision::Allow,
    }
}

/// A sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub view: View,
    pub title: &'static str,
    pub path: &'static str,
}

/// Sidebar entries visible to `principal`; admin-only views are hidden from
/// everyone else. Signed-out sessions get no entries.
#[must_use]
pub fn navigation(principal: Option<&Principal>) -> Vec<NavItem> {
    let Some(principal) = principal else {
        return Vec::new();
    };

    View::ALL
        .into_iter()
        .filter(|view| match view.requirement() {
            Requirement::Public => false,
            Requirement::Authenticated => true,
            Requirement::Admin => principal.is_admin(),
        })
        .map(|view| NavItem {
            view,
            title: view.title(),
            path: view.path(),
        })
        .collect()
}
