use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    middleware_layer::session::SessionContext,
    services::guard::{DEFAULT_PATH, GuardDecision, GuardState, LOGIN_PATH},
    state::AppState,
    views,
};

/// A middleware that applies the route guard to a page navigation.
///
/// On [`GuardDecision::Render`] the chosen `View` and the session snapshot are
/// stored in request extensions for the page handler.
pub async fn guard_navigation(
    State(state): State<AppState>,
    SessionContext(session): SessionContext,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let snapshot = session.snapshot().await;
    let guard_state = GuardState::from_snapshot(&snapshot);
    let decision = state.guard.decide(&path, guard_state);

    tracing::debug!("🧭 {} in {:?} -> {:?}", path, guard_state, decision);

    match decision {
        GuardDecision::Placeholder => views::placeholder().into_response(),
        GuardDecision::Render(view) => {
            request.extensions_mut().insert(view);
            request.extensions_mut().insert(snapshot);
            next.run(request).await
        }
        GuardDecision::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
        GuardDecision::RedirectToDefault => Redirect::to(DEFAULT_PATH).into_response(),
    }
}
