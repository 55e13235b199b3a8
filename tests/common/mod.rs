#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use wellness_api::auth::jwt::create_access_token;
use wellness_api::config::Config;
use wellness_api::db::Store;
use wellness_api::seed::DirectorySeed;
use wellness_api::{build_router, AppState};

pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Store,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::for_secret(SECRET))
    }

    pub fn with_config(config: Config) -> Self {
        let store = Store::in_memory();
        let router = build_router(AppState::new(store.clone(), config.clone()));
        Self {
            router,
            store,
            config,
        }
    }

    pub async fn with_directory(seed: Value) -> Self {
        let app = Self::new();
        DirectorySeed::parse(&seed.to_string())
            .unwrap()
            .apply(&app.store)
            .await
            .unwrap();
        app
    }

    pub fn token(&self, user_id: &str) -> String {
        create_access_token(user_id, 3600, &self.config).unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }
}
