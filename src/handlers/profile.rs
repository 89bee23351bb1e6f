use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    error::Result,
    handlers::auth::IdentityResponse,
    middleware_layer::session::SessionContext,
    validation::auth::ProfileForm,
};

/// Handles profile edits for the signed-in identity.
#[axum::debug_handler]
pub async fn update_profile(
    SessionContext(session): SessionContext,
    Json(payload): Json<ProfileForm>,
) -> Result<Response> {
    let update = payload.into_update()?;
    if update.is_empty() {
        tracing::debug!("Profile update with no fields");
    }

    let identity = session.update_profile(update).await?;

    let response = IdentityResponse {
        success: true,
        identity,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
