use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod config;
pub mod error;
pub mod state;
pub mod views;

pub mod models {
    pub mod demo;
    pub mod identity;
    pub mod session;
}

pub mod repositories {
    pub mod flag;
    pub mod redis_flag;
}

pub mod services {
    pub mod auth;
    pub mod guard;
    pub mod session;
}

pub mod handlers {
    pub mod auth;
    pub mod pages;
    pub mod profile;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod session;
}

pub mod validation {
    pub mod auth;
}

use state::AppState;

/// Builds the application router.
///
/// `/api` routes answer JSON; every other path is a page navigation that goes
/// through the route guard. The whole tree is wrapped by `provide_session`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/session", get(handlers::auth::session_snapshot))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/demo", post(handlers::auth::demo_login))
        .route("/api/profile", patch(handlers::profile::update_profile))
        .with_state(state.clone());

    let page_routes = Router::new()
        .fallback(handlers::pages::render_page)
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::guard_navigation,
        ))
        .with_state(state.clone());

    Router::new()
        .merge(api_routes)
        .fallback_service(page_routes)
        .layer(from_fn_with_state(
            state,
            middleware_layer::session::provide_session,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
}
