use std::net::SocketAddr;
use std::sync::Arc;

use medmentor::{
    build_router,
    config::Config,
    models::demo::DEMO_FLAG_KEY,
    repositories::flag::{FlagStore, MemoryFlagStore},
    services::{auth::MockAuthBackend, session::MissingSessionPolicy},
    state::AppState,
};
use serde_json::{Value, json};

// Shared test context
struct TestContext {
    client: reqwest::Client,
    base_url: String,
    state: AppState,
    flags: Arc<MemoryFlagStore>,
}

impl TestContext {
    async fn start(config: Config, flags: MemoryFlagStore) -> Self {
        let flags = Arc::new(flags);
        let state = AppState::with_parts(
            &config,
            flags.clone(),
            Arc::new(MockAuthBackend::new(config.session_duration_days)),
        );

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .unwrap(),
            base_url: format!("http://{}", addr),
            state,
            flags,
        }
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn patch(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .patch(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_login_flips_the_guard() {
        let context = TestContext::start(Config::default(), MemoryFlagStore::new()).await;

        // Before initialization every known page is the loading placeholder
        let loading = context.get("/login").await;
        assert_eq!(loading.status().as_u16(), 200);
        assert!(loading.text().await.unwrap().contains("aria-label=\"Loading\""));

        let snapshot: Value = context.get("/api/session").await.json().await.unwrap();
        assert_eq!(snapshot["loading"], true);
        assert_eq!(snapshot["identity"], Value::Null);

        context.state.session.initialize().await;

        // Step 1: signed out, the login page renders
        let login_page = context.get("/login").await;
        assert_eq!(login_page.status().as_u16(), 200);
        assert!(login_page.text().await.unwrap().contains("<h1>Sign in</h1>"));

        // Step 2: demo login
        let demo = context.post("/api/auth/demo", json!({})).await;
        assert_eq!(demo.status().as_u16(), 200);
        let demo_body: Value = demo.json().await.unwrap();
        assert_eq!(demo_body["identity"]["name"], "Dr. Ana Ribeiro");
        assert_eq!(
            context.flags.read(DEMO_FLAG_KEY).await.unwrap().as_deref(),
            Some("true")
        );

        // Step 3: /login now redirects, /dashboard renders
        let redirected = context.get("/login").await;
        assert_eq!(redirected.status().as_u16(), 303);
        assert_eq!(location(&redirected), "/dashboard");

        let dashboard = context.get("/dashboard").await;
        assert_eq!(dashboard.status().as_u16(), 200);
        assert!(dashboard.text().await.unwrap().contains("Welcome back, Dr. Ana Ribeiro!"));

        // Step 4: sign out clears everything
        let logout = context.post("/api/auth/logout", json!({})).await;
        assert_eq!(logout.status().as_u16(), 200);
        assert_eq!(context.flags.read(DEMO_FLAG_KEY).await.unwrap(), None);
        assert_eq!(context.get("/login").await.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn test_persisted_flag_rehydrates_the_dashboard() {
        let flags = MemoryFlagStore::with_entries([(DEMO_FLAG_KEY, "true")]);
        let context = TestContext::start(Config::default(), flags).await;
        context.state.session.initialize().await;

        let dashboard = context.get("/dashboard").await;
        assert_eq!(dashboard.status().as_u16(), 200);
        assert!(dashboard.text().await.unwrap().contains("Welcome back, Dr. Ana Ribeiro!"));
    }

    #[tokio::test]
    async fn test_unknown_paths_redirect_to_dashboard() {
        let context = TestContext::start(Config::default(), MemoryFlagStore::new()).await;

        let response = context.get("/definitely/not/a/page").await;
        assert_eq!(response.status().as_u16(), 303);
        assert_eq!(location(&response), "/dashboard");
    }

    #[tokio::test]
    async fn test_require_auth_sends_signed_out_users_to_login() {
        let config = Config {
            require_auth: true,
            ..Config::default()
        };
        let context = TestContext::start(config, MemoryFlagStore::new()).await;
        context.state.session.initialize().await;

        let response = context.get("/profile").await;
        assert_eq!(response.status().as_u16(), 303);
        assert_eq!(location(&response), "/login");

        // Default configuration renders the same page for signed-out users
        let open = TestContext::start(Config::default(), MemoryFlagStore::new()).await;
        open.state.session.initialize().await;
        assert_eq!(open.get("/profile").await.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn test_login_register_and_profile_update() {
        let context = TestContext::start(Config::default(), MemoryFlagStore::new()).await;
        context.state.session.initialize().await;

        // Profile edits need a session under the default policy
        let rejected = context.patch("/api/profile", json!({ "name": "B" })).await;
        assert_eq!(rejected.status().as_u16(), 401);

        // Registration never signs in
        let register = context
            .post(
                "/api/auth/register",
                json!({
                    "email": "new.mentor@example.com",
                    "password": "SecurePass123",
                    "name": "Dr. New Mentor"
                }),
            )
            .await;
        assert_eq!(register.status().as_u16(), 201);
        let snapshot: Value = context.get("/api/session").await.json().await.unwrap();
        assert_eq!(snapshot["identity"], Value::Null);

        // Form validation happens before the store is reached
        let bad_email = context
            .post("/api/auth/login", json!({ "email": "nope", "password": "x" }))
            .await;
        assert_eq!(bad_email.status().as_u16(), 400);

        let login = context
            .post(
                "/api/auth/login",
                json!({ "email": "mentor@example.com", "password": "anything" }),
            )
            .await;
        assert_eq!(login.status().as_u16(), 200);

        let updated = context
            .patch("/api/profile", json!({ "phone": "+55 21 99999-0000" }))
            .await;
        assert_eq!(updated.status().as_u16(), 200);
        let body: Value = updated.json().await.unwrap();
        assert_eq!(body["identity"]["phone"], "+55 21 99999-0000");
        assert_eq!(body["identity"]["name"], "Dr. Ana Ribeiro");
        assert_eq!(body["identity"]["email"], "demo@medmentor.app");
    }

    #[tokio::test]
    async fn test_profile_update_can_ignore_missing_session() {
        let config = Config {
            missing_session_policy: MissingSessionPolicy::Ignore,
            ..Config::default()
        };
        let context = TestContext::start(config, MemoryFlagStore::new()).await;
        context.state.session.initialize().await;

        let response = context.patch("/api/profile", json!({ "name": "B" })).await;
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["identity"], Value::Null);

        let snapshot: Value = context.get("/api/session").await.json().await.unwrap();
        assert_eq!(snapshot["identity"], Value::Null);
    }
}
