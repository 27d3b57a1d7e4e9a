//! Common test utilities for integration tests
//!
//! Builds the real router over an in-memory store, seeds one admin and two
//! employees with ready-made tokens, and drives requests through
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use minicrm_api::app::{build_router, AppState};
use minicrm_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, LogFormat};
use minicrm_shared::models::customer::{CreateCustomer, Customer};
use minicrm_shared::models::user::{CreateUser, Role, User};
use minicrm_shared::store::{CustomerStore, MemoryStore, UserStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub app: Router,
    pub admin: User,
    pub admin_token: String,
    pub employee: User,
    pub employee_token: String,
    pub other_employee: User,
    pub other_employee_token: String,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiration_hours: 1,
        },
        log_format: LogFormat::Pretty,
    }
}

async fn seed_user(store: &MemoryStore, name: &str, email: &str, role: Role) -> User {
    store
        .insert_user(CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            // Seeded users never log in; tokens are issued directly
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2VlZA$c2VlZA".to_string(),
            role,
        })
        .await
        .expect("seed user")
}

impl TestContext {
    /// Creates a fresh context with an empty store plus seeded users
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());

        let admin = seed_user(&store, "Ada Admin", "admin@minicrm.test", Role::Admin).await;
        let employee = seed_user(&store, "Eve Employee", "eve@minicrm.test", Role::Employee).await;
        let other_employee =
            seed_user(&store, "Oscar Other", "oscar@minicrm.test", Role::Employee).await;

        let state = AppState::new(store.clone(), test_config());
        let admin_token = state.tokens.issue(&admin).expect("admin token");
        let employee_token = state.tokens.issue(&employee).expect("employee token");
        let other_employee_token = state.tokens.issue(&other_employee).expect("other token");

        let app = build_router(state.clone());

        TestContext {
            store,
            state,
            app,
            admin,
            admin_token,
            employee,
            employee_token,
            other_employee,
            other_employee_token,
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// An empty body comes back as `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_raw(request).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    pub fn admin(&self) -> Option<&str> {
        Some(&self.admin_token)
    }

    pub fn employee(&self) -> Option<&str> {
        Some(&self.employee_token)
    }

    pub fn other_employee(&self) -> Option<&str> {
        Some(&self.other_employee_token)
    }

    /// Inserts a customer straight into the store
    pub async fn seed_customer(&self, name: &str, email: &str, phone: &str) -> Customer {
        self.store
            .insert_customer(CreateCustomer {
                name: name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                company: None,
            })
            .await
            .expect("seed customer")
    }
}
