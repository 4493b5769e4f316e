#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use chrono::Utc;
use domain::users::{Role, User};
use serde_json::Value;
use server::{app, config::Config, memory::MemoryStore, state::State, utils::new_id};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<State>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::local("integration-secret");
        config.bcrypt_cost = 4;
        configure(&mut config);

        let state = State::with_store(config, Arc::new(MemoryStore::new()));

        Self {
            router: app(state.clone()),
            state,
        }
    }

    /// Stores an account directly and returns it with a valid token.
    pub async fn account(&self, name: &str, role: Role) -> (User, String) {
        let now = Utc::now();
        let user = User {
            id: new_id(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "unused".to_string(),
            role,
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
        };

        assert!(self.state.db.insert_user(&user).await.unwrap());
        let token = self.state.tokens.issue(&user).unwrap();

        (user, token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.send(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, token, None).await
    }

    /// Creates a cake as `admin_token` and returns its id.
    pub async fn cake(&self, admin_token: &str, name: &str, price: f64) -> String {
        let (status, body) = self
            .post(
                "/api/cakes",
                Some(admin_token),
                serde_json::json!({
                    "name": name,
                    "description": format!("{name} with buttercream"),
                    "price": price,
                    "category": "birthday",
                }),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["cake"]["_id"].as_str().unwrap().to_string()
    }

    /// Places an order as `token` and returns its id.
    pub async fn order(&self, token: &str, cake_id: &str, size: &str, quantity: u32) -> String {
        let (status, body) = self
            .post(
                "/api/orders",
                Some(token),
                serde_json::json!({
                    "cakeId": cake_id,
                    "customization": { "size": size, "flavor": "Vanilla" },
                    "quantity": quantity,
                }),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["order"]["_id"].as_str().unwrap().to_string()
    }
}
