use std::sync::Arc;

use crate::{
    config::{Config, FlagBackend},
    error::FlagError,
    repositories::{
        flag::{DemoFlag, FileFlagStore, FlagStore, MemoryFlagStore},
        redis_flag::RedisFlagStore,
    },
    services::{
        auth::{AuthBackend, MockAuthBackend},
        guard::RouteGuard,
        session::SessionStore,
    },
};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The session store shared by every request.
    pub session: SessionStore,
    /// The navigation policy.
    pub guard: Arc<RouteGuard>,
}

impl AppState {
    /// Creates a new `AppState`, connecting to the configured flag storage.
    ///
    /// The session store starts in the loading state; call
    /// [`SessionStore::initialize`] to leave it.
    pub async fn new(config: &Config) -> Result<Self, FlagError> {
        let flags: Arc<dyn FlagStore> = match &config.flag_backend {
            FlagBackend::Memory => {
                tracing::info!("✅ Flag storage: memory");
                Arc::new(MemoryFlagStore::new())
            }
            FlagBackend::File(path) => {
                tracing::info!("✅ Flag storage: file {}", path.display());
                Arc::new(FileFlagStore::new(path.clone()))
            }
            FlagBackend::Redis(url) => Arc::new(RedisFlagStore::connect(url).await?),
        };

        let backend = Arc::new(MockAuthBackend::new(config.session_duration_days));
        tracing::info!("✅ Mock authentication backend initialized");

        Ok(Self::with_parts(config, flags, backend))
    }

    /// Creates a new `AppState` from already built storage and backend.
    pub fn with_parts(
        config: &Config,
        flags: Arc<dyn FlagStore>,
        backend: Arc<dyn AuthBackend>,
    ) -> Self {
        let session = SessionStore::new(
            backend,
            DemoFlag::new(flags),
            config.session_duration_days,
            config.missing_session_policy,
        );

        let guard = Arc::new(RouteGuard::new(config.require_auth));
        if !config.require_auth {
            tracing::warn!("⚠️ REQUIRE_AUTH is off: protected pages render for signed-out users");
        }

        Self {
            config: config.clone(),
            session,
            guard,
        }
    }
}
