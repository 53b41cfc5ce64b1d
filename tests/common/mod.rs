#![allow(dead_code)]

use std::str::FromStr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use glazier_api::{
    auth::AuthService,
    build_router,
    config::AppConfig,
    db,
    entities::{service, user, UserRole},
    errors::ServiceError,
    mailer::{MailMessage, Mailer},
    services::catalog::ServiceRequest,
    AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// Mailer that keeps every message and can be told to fail.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<MailMessage>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: MailMessage) -> Result<(), ServiceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::ExternalServiceError(
                "mail relay unavailable".to_string(),
            ));
        }
        self.sent.lock().expect("mailer lock").push(message);
        Ok(())
    }
}

/// A signed-in account created directly in the database.
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

/// Decoded response: status plus JSON body (`Value::Null` when empty).
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn id(&self) -> Uuid {
        self.data()["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("response should carry data.id")
    }
}

/// Reads a decimal that may be serialized as a string or a number.
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("expected a decimal, got {other}"),
    }
}

/// Helper harness for spinning up the full router backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            "127.0.0.1".to_string(),
            18_080,
        );

        let pool = db::establish_connection_with_config(&db::DbConfig::from(&cfg))
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(Arc::new(pool), cfg, mailer.clone());
        let router = build_router(state.clone());

        Self {
            router,
            state,
            mailer,
        }
    }

    pub async fn create_user(&self, name: &str, role: UserRole) -> TestUser {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(format!(
                "{}.{}@example.com",
                name.to_lowercase().replace(' ', "."),
                &Uuid::new_v4().simple().to_string()[..6]
            )),
            password_hash: Set(AuthService::hash_password("correct horse battery").expect("hash")),
            role: Set(role),
            phone: Set(None),
            address: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed user");

        let token = self.state.auth.issue_token(&model).expect("issue token");
        TestUser {
            id: model.id,
            token,
        }
    }

    pub async fn customer(&self) -> TestUser {
        self.create_user("Maria Santos", UserRole::Customer).await
    }

    pub async fn staff(&self) -> TestUser {
        self.create_user("Jun Staff", UserRole::Staff).await
    }

    pub async fn admin(&self) -> TestUser {
        self.create_user("Ada Admin", UserRole::Admin).await
    }

    pub async fn seed_service(&self, name: &str, price: Decimal) -> service::Model {
        self.state
            .services
            .catalog
            .create_service(ServiceRequest {
                name: name.to_string(),
                description: format!("{name} made to measure"),
                category: "Windows".to_string(),
                price,
                colors: vec!["Black".to_string(), "Silver".to_string()],
                images: vec![],
                is_available: true,
            })
            .await
            .expect("seed service")
    }

    /// Places a single-line order through the API and returns its id.
    pub async fn place_order(&self, customer: &TestUser, service: &service::Model, quantity: i32) -> Uuid {
        let response = self
            .request(
                Method::POST,
                "/api/orders",
                Some(serde_json::json!({
                    "items": [{
                        "service_id": service.id,
                        "color": "Black",
                        "quantity": quantity,
                        "price": service.price,
                    }]
                })),
                Some(&customer.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.id()
    }

    /// Sends a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body bytes");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
