use crate::models::session::SessionSnapshot;

/// The path unauthenticated users are sent to.
pub const LOGIN_PATH: &str = "/login";
/// The default authenticated view.
pub const DEFAULT_PATH: &str = "/dashboard";

/// The page a navigation renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Dashboard,
    Messages,
    Profile,
    Settings,
    Help,
}

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Only shown to signed-out users (login, register).
    PublicOnly,
    /// Application pages.
    Protected,
}

/// A known navigation target.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub path: &'static str,
    pub view: View,
    pub class: RouteClass,
    /// Overrides the guard's `require_auth` default for this protected route.
    pub require_auth: Option<bool>,
}

impl Route {
    pub const fn public_only(path: &'static str, view: View) -> Self {
        Self { path, view, class: RouteClass::PublicOnly, require_auth: None }
    }

    pub const fn protected(path: &'static str, view: View) -> Self {
        Self { path, view, class: RouteClass::Protected, require_auth: None }
    }

    /// Returns this route with its own `require_auth` setting.
    pub const fn requiring_auth(self, require_auth: bool) -> Self {
        Self { require_auth: Some(require_auth), ..self }
    }
}

/// The application's route table.
pub const ROUTES: &[Route] = &[
    Route::public_only("/login", View::Login),
    Route::public_only("/register", View::Register),
    Route::protected("/dashboard", View::Dashboard),
    Route::protected("/messages", View::Messages),
    Route::protected("/profile", View::Profile),
    Route::protected("/settings", View::Settings),
    Route::protected("/help", View::Help),
];

/// Session state as seen by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authenticated,
    Unauthenticated,
}

impl GuardState {
    /// Derives the guard state from a session snapshot.
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        match (snapshot.loading, snapshot.identity.is_some()) {
            (true, _) => GuardState::Loading,
            (false, true) => GuardState::Authenticated,
            (false, false) => GuardState::Unauthenticated,
        }
    }
}

/// What to do with a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the loading indicator.
    Placeholder,
    /// Render the requested view.
    Render(View),
    RedirectToLogin,
    RedirectToDefault,
}

/// Per-navigation render-or-redirect policy.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    routes: &'static [Route],
    require_auth: bool,
}

impl RouteGuard {
    /// Creates a new `RouteGuard` over the application's route table.
    ///
    /// With `require_auth` off, protected views render for signed-out users.
    pub fn new(require_auth: bool) -> Self {
        Self::with_routes(ROUTES, require_auth)
    }

    /// Creates a new `RouteGuard` over `routes`.
    ///
    /// `require_auth` applies to protected routes that do not set their own.
    pub fn with_routes(routes: &'static [Route], require_auth: bool) -> Self {
        Self {
            routes,
            require_auth,
        }
    }

    /// Looks up the route for `path`, ignoring a trailing slash.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        self.routes.iter().find(|route| route.path == path)
    }

    /// Decides how to answer a navigation to `path` in `state`.
    pub fn decide(&self, path: &str, state: GuardState) -> GuardDecision {
        let Some(route) = self.resolve(path) else {
            return GuardDecision::RedirectToDefault;
        };

        match (route.class, state) {
            (_, GuardState::Loading) => GuardDecision::Placeholder,

            (RouteClass::PublicOnly, GuardState::Authenticated) => GuardDecision::RedirectToDefault,
            (RouteClass::PublicOnly, GuardState::Unauthenticated) => GuardDecision::Render(route.view),

            (RouteClass::Protected, GuardState::Authenticated) => GuardDecision::Render(route.view),
            (RouteClass::Protected, GuardState::Unauthenticated)
                if route.require_auth.unwrap_or(self.require_auth) =>
            {
                GuardDecision::RedirectToLogin
            }
            (RouteClass::Protected, GuardState::Unauthenticated) => GuardDecision::Render(route.view),
        }
    }
}
