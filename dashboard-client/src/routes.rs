use strum::{EnumIter, IntoEnumIterator};

/// The dashboard routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Route {
    /// `/`, never rendered; always redirects.
    Root,
    /// `/login`
    Login,
    /// `/dashboard`
    Dashboard,
    /// `/users`
    Users,
    /// `/reports`
    Reports,
    /// Any other path.
    NotFound,
}

/// What the guard decided for a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Show this route.
    Render(Route),
    /// Go here instead. The requested route is not remembered.
    Redirect(Route),
}

impl Route {
    /// Canonical path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Users => "/users",
            Self::Reports => "/reports",
            Self::NotFound => "/404",
        }
    }

    /// Matches `path` against the known routes. A single trailing slash and
    /// any query string or fragment are ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        if path.is_empty() {
            return Self::Root;
        }
        Self::iter()
            .filter(|route| *route != Self::NotFound)
            .find(|route| route.path() == path)
            .unwrap_or(Self::NotFound)
    }

    /// Needs an authenticated session.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Root | Self::Login)
    }

    /// Label shown in the navigation shell.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Root | Self::Dashboard => "Dashboard",
            Self::Login => "Login",
            Self::Users => "Users",
            Self::Reports => "Reports",
            Self::NotFound => "Not Found",
        }
    }

    /// Entries of the navigation shell, in display order.
    pub fn menu() -> impl Iterator<Item = Self> {
        Self::iter().filter(|route| matches!(route, Self::Dashboard | Self::Users | Self::Reports))
    }
}

/// Decides whether `route` renders or redirects for the given session.
#[must_use]
pub const fn guard(route: Route, is_authenticated: bool) -> Navigation {
    match (route, is_authenticated) {
        (Route::Login, false) => Navigation::Render(Route::Login),
        (Route::Login | Route::Root, true) => Navigation::Redirect(Route::Dashboard),
        (Route::Root, false) => Navigation::Redirect(Route::Login),
        (protected, true) => Navigation::Render(protected),
        (_, false) => Navigation::Redirect(Route::Login),
    }
}
