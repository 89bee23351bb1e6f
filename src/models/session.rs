use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identity::Identity;

/// Represents the credential record paired with an [`Identity`].
///
/// A `Session` exists if and only if an identity is signed in; both are
/// installed and dropped together by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The bearer token presented to the backend.
    pub access_token: String,
    /// The token used to obtain a new access token.
    pub refresh_token: String,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
    /// The token type, usually `bearer`.
    pub token_type: String,
    /// Claims copied from the identity at sign-in.
    pub claims: SessionClaims,
}

/// Identity-derived claims carried by a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
}

impl From<&Identity> for SessionClaims {
    fn from(identity: &Identity) -> Self {
        Self {
            sub: identity.id,
            email: identity.email.clone(),
            name: identity.name.clone(),
        }
    }
}

/// A read-only copy of the session store's state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub session: Option<Session>,
    pub loading: bool,
}
