use async_trait::async_trait;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    error::AuthResult,
    models::{
        demo,
        identity::{Identity, ProfileUpdate},
        session::Session,
    },
};

/// Email and password submitted by a sign-in or sign-up form.
///
/// The password is wiped from memory when the value is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Creates new `Credentials`.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns `true` when either field is empty.
    ///
    /// Format rules belong to the calling form.
    pub fn is_incomplete(&self) -> bool {
        self.email.is_empty() || self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A successful authentication.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub identity: Identity,
    pub session: Session,
    /// Whether this is the demo session, which is rehydrated on restart.
    pub demo: bool,
}

/// The capability the session store needs from an identity provider.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchanges credentials for an identity and session.
    async fn authenticate(&self, credentials: &Credentials) -> AuthResult<Authenticated>;

    /// Registers a new account. Does not sign the user in.
    async fn register(&self, credentials: &Credentials, profile: &ProfileUpdate) -> AuthResult<()>;
}

/// A backend that accepts any credentials and always hands out the demo session.
#[derive(Debug, Clone)]
pub struct MockAuthBackend {
    session_duration_days: i64,
}

impl MockAuthBackend {
    /// Creates a new `MockAuthBackend` whose sessions last `session_duration_days`.
    pub fn new(session_duration_days: i64) -> Self {
        Self {
            session_duration_days,
        }
    }
}

/// Builds the demo identity/session pair.
pub fn demo_authentication(session_duration_days: i64) -> Authenticated {
    let identity = demo::demo_identity();
    let session = demo::demo_session(&identity, session_duration_days);
    Authenticated {
        identity,
        session,
        demo: true,
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn authenticate(&self, credentials: &Credentials) -> AuthResult<Authenticated> {
        tracing::debug!("🔐 Mock backend accepting credentials for: {}", credentials.email);
        Ok(demo_authentication(self.session_duration_days))
    }

    async fn register(&self, credentials: &Credentials, profile: &ProfileUpdate) -> AuthResult<()> {
        tracing::debug!(
            "📝 Mock backend accepting registration for: {} ({:?})",
            credentials.email,
            profile.name
        );
        Ok(())
    }
}
