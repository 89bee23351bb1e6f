use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, services::session::SessionStore, state::AppState};

/// A middleware that makes the session store reachable from every request.
///
/// Everything layered under it is the store's provisioning scope.
pub async fn provide_session(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(state.session.clone());
    next.run(request).await
}

/// Extracts the session store provided by [`provide_session`].
///
/// Rejects with [`AppError::MissingSessionProvider`] when the layer is absent.
#[derive(Clone)]
pub struct SessionContext(pub SessionStore);

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        SessionStore::from_extensions(&parts.extensions).map(SessionContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::repositories::flag::MemoryFlagStore;
    use crate::services::auth::MockAuthBackend;
    use axum::{Router, http::StatusCode, middleware::from_fn_with_state, routing::get};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn loading(SessionContext(session): SessionContext) -> String {
        session.snapshot().await.loading.to_string()
    }

    fn state() -> AppState {
        AppState::with_parts(
            &Config::default(),
            Arc::new(MemoryFlagStore::new()),
            Arc::new(MockAuthBackend::new(7)),
        )
    }

    #[tokio::test]
    async fn extractor_fails_outside_the_provider() {
        let app = Router::new().route("/probe", get(loading));

        let response = app
            .oneshot(Request::builder().uri("/probe").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn extractor_finds_the_provided_store() {
        let state = state();
        let app = Router::new()
            .route("/probe", get(loading))
            .layer(from_fn_with_state(state.clone(), provide_session));

        let response = app
            .oneshot(Request::builder().uri("/probe").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"true");
    }
}
