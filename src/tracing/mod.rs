use axum::{extract::Request, middleware::Next, response::Response};
use std::{cell::RefCell, future::Future, time::Instant};
use uuid::Uuid;

pub use tracing::{debug, error, info, warn};

/// Request ID tracking information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl Default for RequestId {
    fn default() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

impl RequestId {
    pub fn new(value: impl Into<String>) -> Self {
        RequestId(value.into())
    }

    /// Accepts a caller-supplied id only when it is short printable ASCII.
    pub fn from_header(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || trimmed.len() > 128
            || !trimmed.chars().all(|c| c.is_ascii_graphic())
        {
            return None;
        }
        Some(RequestId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

tokio::task_local! {
    static CURRENT_REQUEST_ID: RefCell<Option<RequestId>>;
}

pub async fn scope_request_id<Fut, R>(request_id: RequestId, future: Fut) -> R
where
    Fut: Future<Output = R>,
{
    CURRENT_REQUEST_ID
        .scope(RefCell::new(Some(request_id)), future)
        .await
}

pub fn current_request_id() -> Option<RequestId> {
    CURRENT_REQUEST_ID
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
}

/// Logs method, path, status and latency of every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    crate::metrics::observe_request(status.as_u16());

    if status.is_server_error() {
        error!(%method, %uri, status = status.as_u16(), elapsed_ms, "request failed");
    } else if status.is_client_error() {
        warn!(%method, %uri, status = status.as_u16(), elapsed_ms, "request rejected");
    } else {
        info!(%method, %uri, status = status.as_u16(), elapsed_ms, "request completed");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_id_is_visible_inside_scope_only() {
        assert!(current_request_id().is_none());
        let seen = scope_request_id(RequestId::new("req-1"), async { current_request_id() }).await;
        assert_eq!(seen, Some(RequestId::new("req-1")));
        assert!(current_request_id().is_none());
    }

    #[test]
    fn header_ids_must_be_printable_ascii() {
        assert_eq!(
            RequestId::from_header(" abc-123 "),
            Some(RequestId::new("abc-123"))
        );
        assert!(RequestId::from_header("").is_none());
        assert!(RequestId::from_header("has space").is_none());
        assert!(RequestId::from_header(&"x".repeat(200)).is_none());
    }
}
