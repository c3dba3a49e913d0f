//! Navigation routes and role-based route guards.
//!
//! Every screen is reachable through one [`Route`]. The guard is purely a
//! presentation concern: the REST API enforces its own authorization.

use std::fmt;

use crate::error::CoreError;
use crate::identity::Identity;
use crate::roles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Projects,
    ProjectDetail,
    Orders,
    OrderDetail,
    Assets,
    AssetDetail,
    Tasks,
    TaskDetail,
    Profile,
    ChangePassword,
    Users,
}

/// Minimum audience of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Audience {
    Anyone,
    Staff,
    Admin,
}

impl Route {
    /// Sidebar order.
    pub const ALL: &'static [Route] = &[
        Route::Dashboard,
        Route::Projects,
        Route::ProjectDetail,
        Route::Orders,
        Route::OrderDetail,
        Route::Assets,
        Route::AssetDetail,
        Route::Tasks,
        Route::TaskDetail,
        Route::Profile,
        Route::ChangePassword,
        Route::Users,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::Projects => "/projects",
            Route::ProjectDetail => "/projects/:id",
            Route::Orders => "/orders",
            Route::OrderDetail => "/orders/:id",
            Route::Assets => "/assets",
            Route::AssetDetail => "/assets/:id",
            Route::Tasks => "/tasks",
            Route::TaskDetail => "/tasks/:id",
            Route::Profile => "/profile",
            Route::ChangePassword => "/change-password",
            Route::Users => "/users",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Projects => "Projects",
            Route::ProjectDetail => "Project",
            Route::Orders => "Orders",
            Route::OrderDetail => "Order",
            Route::Assets => "Assets",
            Route::AssetDetail => "Asset",
            Route::Tasks => "Tasks",
            Route::TaskDetail => "Task",
            Route::Profile => "Profile",
            Route::ChangePassword => "Change Password",
            Route::Users => "Users",
        }
    }

    /// Detail routes are opened from a list row, never from the sidebar.
    pub fn is_detail(self) -> bool {
        matches!(
            self,
            Route::ProjectDetail | Route::OrderDetail | Route::AssetDetail | Route::TaskDetail
        )
    }

    fn audience(self) -> Audience {
        match self {
            Route::Tasks | Route::TaskDetail => Audience::Staff,
            Route::Users => Audience::Admin,
            _ => Audience::Anyone,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn audience_of(identity: &Identity) -> Audience {
    if identity.is_admin() {
        Audience::Admin
    } else if roles::is_staff(identity.role()) {
        Audience::Staff
    } else {
        Audience::Anyone
    }
}

/// Whether `identity` may open `route`. Signed-out sessions may open nothing.
pub fn can_access(identity: Option<&Identity>, route: Route) -> bool {
    identity.is_some_and(|id| audience_of(id) >= route.audience())
}

/// Guard a navigation: `Unauthorized` when signed out (redirect to login),
/// `Forbidden` when the role may not open the route.
pub fn guard(identity: Option<&Identity>, route: Route) -> Result<(), CoreError> {
    let Some(identity) = identity else {
        return Err(CoreError::Unauthorized("Please log in".into()));
    };
    if can_access(Some(identity), route) {
        Ok(())
    } else {
        tracing::debug!(role = identity.role(), route = route.path(), "Route denied");
        Err(CoreError::Forbidden(format!(
            "{} is not available to the {} role",
            route.label(),
            identity.role()
        )))
    }
}

/// Sidebar entries for `identity`, in fixed order.
pub fn sidebar(identity: Option<&Identity>) -> Vec<Route> {
    Route::ALL
        .iter()
        .copied()
        .filter(|r| !r.is_detail() && can_access(identity, *r))
        .collect()
}
