//! # glazier-api
//!
//! Storefront and back-office HTTP backend for an aluminum and glass
//! fabrication shop: service catalog, cart checkout, orders with proof-of-payment
//! verification, quotations, support chat, ratings and feedback, plus inventory,
//! supplier, staff and calendar management for the back office.

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod mailer;
pub mod metrics;
pub mod middleware_helpers;
pub mod services;
pub mod tracing;
pub mod validation;

use axum::{http::HeaderValue, middleware, routing::get, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

use crate::{auth::AuthService, config::AppConfig, db::DbPool, mailer::Mailer};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub mailer: Arc<dyn Mailer>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        let auth = Arc::new(AuthService::new(
            auth::AuthConfig::from_app_config(&config),
            db.clone(),
        ));
        let services = handlers::AppServices::new(db.clone(), mailer.clone());
        Self {
            db,
            config: Arc::new(config),
            auth,
            mailer,
            services,
        }
    }
}

// Common response wrappers
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[test]
    fn message_is_serialized_and_empty_fields_are_skipped() {
        let value =
            serde_json::to_value(ApiResponse::success(()).with_message("Order cancelled")).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Order cancelled");
        assert!(value["meta"]["timestamp"].is_string());
        assert!(value["meta"].get("request_id").is_none());
    }
}

/// Every `/api` route. Role checks happen in the `AuthUser`, `StaffUser` and
/// `AdminUser` extractors.
pub fn api_routes() -> Router<AppState> {
    let admin = Router::new()
        .merge(handlers::orders::admin_routes())
        .merge(handlers::payments::admin_routes())
        .merge(handlers::quotations::admin_routes())
        .merge(handlers::catalog::admin_routes())
        .merge(handlers::inventory::admin_routes())
        .merge(handlers::tasks::admin_routes())
        .merge(handlers::feedback::admin_routes())
        .merge(handlers::staff::admin_routes())
        .merge(handlers::users::admin_routes());

    Router::new()
        .nest("/auth", handlers::auth::auth_router())
        .merge(handlers::catalog::routes())
        .merge(handlers::orders::routes())
        .merge(handlers::payments::routes())
        .merge(handlers::quotations::routes())
        .merge(handlers::notifications::routes())
        .merge(handlers::chat::routes())
        .merge(handlers::feedback::routes())
        .merge(handlers::ratings::routes())
        .nest("/admin", admin)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        ::tracing::info!("Using permissive CORS because no origins were configured");
        CorsLayer::permissive()
    } else {
        // Session cookies need credentials, which rules out wildcard origins.
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::PATCH,
                http::Method::DELETE,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true)
    }
}

/// Full application router with middleware, ready to serve.
pub fn build_router(state: AppState) -> Router {
    metrics::init();
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(handlers::health::routes())
        .route("/metrics", get(metrics::metrics_handler))
        .nest("/api", api_routes())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(crate::tracing::log_requests))
        .layer(middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
