use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

use crate::{
    error::{AppError, AuthError, AuthResult},
    models::{
        identity::{Identity, ProfileUpdate},
        session::{Session, SessionClaims, SessionSnapshot},
    },
    repositories::flag::DemoFlag,
    services::{
        auth::{self, AuthBackend, Authenticated, Credentials},
        guard::GuardState,
    },
};

/// What `update_profile` does when nobody is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingSessionPolicy {
    /// Fail with [`AuthError::NoActiveSession`].
    #[default]
    Reject,
    /// Report success without touching state.
    Ignore,
}

#[derive(Debug)]
struct SessionState {
    identity: Option<Identity>,
    session: Option<Session>,
    loading: bool,
}

impl SessionState {
    fn install(&mut self, identity: Identity, session: Session) {
        self.identity = Some(identity);
        self.session = Some(session);
    }

    fn clear(&mut self) {
        self.identity = None;
        self.session = None;
    }
}

/// The single source of truth for who is signed in.
///
/// One store is built at startup and shared through `AppState`; clones are
/// handles to the same state. State only changes through the methods below.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    initialized: Arc<OnceCell<()>>,
    backend: Arc<dyn AuthBackend>,
    flag: DemoFlag,
    session_duration_days: i64,
    missing_session_policy: MissingSessionPolicy,
}

impl SessionStore {
    /// Creates a new `SessionStore` in the loading state.
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        flag: DemoFlag,
        session_duration_days: i64,
        missing_session_policy: MissingSessionPolicy,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                identity: None,
                session: None,
                loading: true,
            })),
            initialized: Arc::new(OnceCell::new()),
            backend,
            flag,
            session_duration_days,
            missing_session_policy,
        }
    }

    /// Looks the store up from request extensions.
    ///
    /// Fails with [`AppError::MissingSessionProvider`] outside the
    /// `provide_session` layer.
    pub fn from_extensions(extensions: &http::Extensions) -> Result<Self, AppError> {
        extensions
            .get::<SessionStore>()
            .cloned()
            .ok_or(AppError::MissingSessionProvider)
    }

    /// Rehydrates the demo session if the persisted flag is set, then leaves
    /// the loading state.
    ///
    /// Runs once; later calls wait for the first one and return.
    pub async fn initialize(&self) {
        self.initialized
            .get_or_init(|| async {
                let mut state = self.state.write().await;
                let rehydrate = match self.flag.is_active().await {
                    Ok(active) => active,
                    Err(e) => {
                        tracing::warn!("⚠️ Failed to read demo flag, starting signed out: {}", e);
                        false
                    }
                };

                if rehydrate {
                    let demo = auth::demo_authentication(self.session_duration_days);
                    state.install(demo.identity, demo.session);
                    tracing::info!("✅ Demo session rehydrated");
                }
                state.loading = false;
                tracing::info!("✅ Session store initialized");
            })
            .await;
    }

    /// Signs in through the authentication backend.
    pub async fn sign_in(&self, credentials: Credentials) -> AuthResult<Identity> {
        if credentials.is_incomplete() {
            return Err(AuthError::MissingCredentials);
        }

        tracing::info!("🔐 Sign-in attempt: {}", credentials.email);
        let authenticated = self.backend.authenticate(&credentials).await?;
        let identity = self.install(authenticated).await;

        tracing::info!("✅ User signed in: {}", identity.id);
        Ok(identity)
    }

    /// Registers an account. Does not change who is signed in.
    pub async fn sign_up(&self, credentials: Credentials, profile: ProfileUpdate) -> AuthResult<()> {
        tracing::info!("📝 Sign-up attempt: {}", credentials.email);
        self.backend.register(&credentials, &profile).await?;
        tracing::info!("✅ Sign-up accepted: {}", credentials.email);
        Ok(())
    }

    /// Clears the identity, session and persisted flag. Idempotent.
    pub async fn sign_out(&self) -> AuthResult<()> {
        // The flag is cleared under the same write guard as the state.
        let mut state = self.state.write().await;
        let previous = state.identity.as_ref().map(|identity| identity.id);
        state.clear();

        if let Err(e) = self.flag.clear().await {
            tracing::warn!("⚠️ Failed to clear demo flag: {}", e);
        }
        drop(state);

        match previous {
            Some(id) => tracing::info!("👋 User signed out: {}", id),
            None => tracing::debug!("Sign-out with no active session"),
        }
        Ok(())
    }

    /// Merges `update` into the signed-in identity.
    ///
    /// Returns the updated identity, or `None` when nobody is signed in and the
    /// policy is [`MissingSessionPolicy::Ignore`].
    pub async fn update_profile(&self, update: ProfileUpdate) -> AuthResult<Option<Identity>> {
        let mut state = self.state.write().await;

        let Some(identity) = state.identity.as_mut() else {
            return match self.missing_session_policy {
                MissingSessionPolicy::Reject => {
                    tracing::warn!("❌ Profile update without an active session");
                    Err(AuthError::NoActiveSession)
                }
                MissingSessionPolicy::Ignore => {
                    tracing::debug!("Profile update ignored: no active session");
                    Ok(None)
                }
            };
        };

        identity.apply(update);
        let updated = identity.clone();
        if let Some(session) = state.session.as_mut() {
            session.claims = SessionClaims::from(&updated);
        }

        tracing::info!("✅ Profile updated: {}", updated.id);
        Ok(Some(updated))
    }

    /// Installs the fixed demo identity and session.
    pub async fn demo_login(&self) -> AuthResult<Identity> {
        let identity = self
            .install(auth::demo_authentication(self.session_duration_days))
            .await;

        tracing::info!("✅ Demo login: {}", identity.id);
        Ok(identity)
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            identity: state.identity.clone(),
            session: state.session.clone(),
            loading: state.loading,
        }
    }

    /// Returns the state the route guard evaluates.
    pub async fn guard_state(&self) -> GuardState {
        GuardState::from_snapshot(&self.snapshot().await)
    }

    async fn install(&self, authenticated: Authenticated) -> Identity {
        let Authenticated {
            identity,
            session,
            demo,
        } = authenticated;

        let mut state = self.state.write().await;
        state.install(identity.clone(), session);

        // Held across the flag write so a concurrent sign_out cannot interleave.
        let persisted = if demo {
            self.flag.activate().await
        } else {
            self.flag.clear().await
        };
        if let Err(e) = persisted {
            tracing::warn!("⚠️ Failed to persist demo flag: {}", e);
        }
        drop(state);

        identity
    }
}
