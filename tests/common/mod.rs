#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use orbit_api::{
    api_routes,
    auth::Role,
    config::AppConfig,
    db::{establish_connection_with_config, run_migrations, DbConfig},
    request_id::request_id_middleware,
    AppState,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str =
    "super_secure_jwt_secret_that_is_long_enough_for_hs256_signing_0987";

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Builds an app over a private in-memory database. The pool is capped
    /// at one connection so every query sees the same SQLite instance.
    pub async fn spawn_with(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_JWT_SECRET.to_string(),
            86400,
            "127.0.0.1".to_string(),
            0,
            "development".to_string(),
        );
        tweak(&mut config);

        let db_config = DbConfig {
            url: config.database_url().to_string(),
            max_connections: 1,
            min_connections: 1,
            idle_timeout: Duration::from_secs(3600),
            ..Default::default()
        };
        let db = establish_connection_with_config(&db_config)
            .await
            .expect("test database should connect");
        run_migrations(&db).await.expect("migrations should apply");

        let state = AppState::new(Arc::new(db), config);
        let router = Router::new()
            .nest("/api", api_routes(&state.services))
            .layer(axum::middleware::from_fn(request_id_middleware))
            .with_state(state.clone());

        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request should build"),
            None => builder.body(Body::empty()).expect("request should build"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request should complete")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Registers a user with the given role and returns a bearer token
    pub async fn token_for(&self, role: Role) -> String {
        let email = format!("{}-{}@test.local", role.as_str(), uuid::Uuid::new_v4());
        let response = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "email": email,
                    "password": "test-password-1",
                    "name": format!("{} user", role.as_str()),
                    "role": role.as_str(),
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = self
            .post(
                "/api/auth/login",
                None,
                json!({
                    "email": email,
                    "password": "test-password-1",
                    "role": role.as_str(),
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        body["data"]["token"]
            .as_str()
            .expect("login should return a token")
            .to_string()
    }
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
