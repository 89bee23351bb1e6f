use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    error::Result,
    middleware_layer::session::SessionContext,
    models::identity::Identity,
    validation::auth::{LoginForm, RegisterForm},
};

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// The response payload for requests that return the signed-in identity.
#[derive(Serialize)]
pub struct IdentityResponse {
    pub success: bool,
    pub identity: Option<Identity>,
}

/// Returns the current session snapshot.
pub async fn session_snapshot(SessionContext(session): SessionContext) -> Response {
    Json(session.snapshot().await).into_response()
}

/// Handles sign-in.
#[axum::debug_handler]
pub async fn login(
    SessionContext(session): SessionContext,
    Json(payload): Json<LoginForm>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt - Payload: {:?}", payload);
    let credentials = payload.into_credentials()?;

    let identity = session.sign_in(credentials).await?;

    let response = IdentityResponse {
        success: true,
        identity: Some(identity),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles registration.
#[axum::debug_handler]
pub async fn register(
    SessionContext(session): SessionContext,
    Json(payload): Json<RegisterForm>,
) -> Result<Response> {
    tracing::info!("📝 Register attempt - Payload: {:?}", payload);
    let (credentials, profile) = payload.into_parts()?;

    session.sign_up(credentials, profile).await?;

    let response = AuthResponse {
        success: true,
        message: "Registration successful. Please sign in.".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles sign-out.
#[axum::debug_handler]
pub async fn logout(SessionContext(session): SessionContext) -> Result<Response> {
    session.sign_out().await?;

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles the one-click demo login.
#[axum::debug_handler]
pub async fn demo_login(SessionContext(session): SessionContext) -> Result<Response> {
    let identity = session.demo_login().await?;

    let response = IdentityResponse {
        success: true,
        identity: Some(identity),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
