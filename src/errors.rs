use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::error;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g. "Not Found")
    pub error: String,
    /// Machine-readable tag, see [`ErrorKind`]
    pub kind: ErrorKind,
    /// Human-readable description shown to the user
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

/// Coarse classification callers branch on instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    Conflict,
    InvalidTransition,
    Unauthorized,
    Forbidden,
    Unexpected,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(crate::validation::join_errors(&err))
    }
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        ServiceError::NotFound(format!("{} not found", entity))
    }

    /// Maps a unique-index violation raised by a write to `Conflict`, so a
    /// duplicate that slips past the read-side check still answers 409.
    pub fn unique_violation(err: DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Conflict(message.to_string()),
            _ => ServiceError::DatabaseError(err),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ValidationError(_) => ErrorKind::ValidationFailed,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidTransition(_) => ErrorKind::InvalidTransition,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::DatabaseError(_) | Self::ExternalServiceError(_) | Self::InternalError(_) => {
                ErrorKind::Unexpected
            }
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::ExternalServiceError(_) => "An upstream service is unavailable".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, kind = %self.kind(), "Request failed");
        }

        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            kind: self.kind(),
            message: self.response_message(),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rstest::rstest;

    #[tokio::test]
    async fn service_error_response_includes_request_id_and_kind() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("req-123"), async {
                ServiceError::not_found("Order").into_response()
            })
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.request_id.as_deref(), Some("req-123"));
        assert_eq!(payload.kind, ErrorKind::NotFound);
        assert_eq!(payload.message, "Order not found");
        assert_eq!(payload.error, "Not Found");
    }

    #[rstest]
    #[case(ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND, ErrorKind::NotFound)]
    #[case(ServiceError::ValidationError("x".into()), StatusCode::BAD_REQUEST, ErrorKind::ValidationFailed)]
    #[case(ServiceError::Conflict("x".into()), StatusCode::CONFLICT, ErrorKind::Conflict)]
    #[case(ServiceError::InvalidTransition("x".into()), StatusCode::BAD_REQUEST, ErrorKind::InvalidTransition)]
    #[case(ServiceError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, ErrorKind::Unauthorized)]
    #[case(ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN, ErrorKind::Forbidden)]
    #[case(ServiceError::DatabaseError(DbErr::Custom("x".into())), StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Unexpected)]
    #[case(ServiceError::ExternalServiceError("x".into()), StatusCode::BAD_GATEWAY, ErrorKind::Unexpected)]
    #[case(ServiceError::InternalError("x".into()), StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Unexpected)]
    fn status_and_kind_mapping(
        #[case] err: ServiceError,
        #[case] status: StatusCode,
        #[case] kind: ErrorKind,
    ) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn response_message_hides_internal_details() {
        let err = ServiceError::DatabaseError(DbErr::Custom("password=hunter2".into()));
        assert!(!err.response_message().contains("hunter2"));

        let err = ServiceError::Conflict("Email is already registered".into());
        assert_eq!(err.response_message(), "Email is already registered");
    }

    #[tokio::test]
    async fn duplicate_insert_maps_to_conflict() {
        use crate::entities::supplier;
        use sea_orm::{ActiveModelTrait, Set};

        let db = crate::db::establish_connection("sqlite::memory:").await.unwrap();
        crate::db::run_migrations(&db).await.unwrap();

        let row = |name: &str| supplier::ActiveModel {
            id: Set(uuid::Uuid::new_v4()),
            name: Set(name.to_string()),
            contact_person: Set("Tess Reyes".to_string()),
            email: Set(None),
            phone: Set(None),
            address: Set(None),
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(chrono::Utc::now()),
        };
        row("Metro Aluminum").insert(&db).await.unwrap();
        let err = row("Metro Aluminum").insert(&db).await.unwrap_err();

        let mapped = ServiceError::unique_violation(err, "Supplier already exists");
        assert_eq!(mapped.status_code(), StatusCode::CONFLICT);
        assert_eq!(mapped.response_message(), "Supplier already exists");

        let other = ServiceError::unique_violation(DbErr::Custom("boom".into()), "unused");
        assert_eq!(other.kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ErrorKind::InvalidTransition).unwrap(),
            serde_json::json!("invalid_transition")
        );
        assert_eq!(ErrorKind::ValidationFailed.to_string(), "validation_failed");
    }
}
