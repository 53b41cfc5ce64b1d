use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::error;

lazy_static! {
    static ref REGISTRY: Registry = Registry::new_custom(Some("glazier".into()), None)
        .expect("registry can be created");
    static ref ORDERS_SUBMITTED: IntCounter =
        IntCounter::new("orders_submitted_total", "Total number of orders submitted")
            .expect("metric can be created");
    static ref ORDERS_CANCELLED: IntCounter =
        IntCounter::new("orders_cancelled_total", "Total number of orders cancelled")
            .expect("metric can be created");
    static ref ORDER_TRANSITIONS: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "order_transitions_total",
            "Order status transitions by target status"
        ),
        &["status"]
    )
    .expect("metric can be created");
    static ref PAYMENTS_SUBMITTED: IntCounter = IntCounter::new(
        "payments_submitted_total",
        "Total number of payment proofs submitted"
    )
    .expect("metric can be created");
    static ref PAYMENTS_VERIFIED: IntCounter = IntCounter::new(
        "payments_verified_total",
        "Total number of payments verified by staff"
    )
    .expect("metric can be created");
    static ref QUOTATION_EMAILS_FAILED: IntCounter = IntCounter::new(
        "quotation_emails_failed_total",
        "Quotation status emails the relay did not accept"
    )
    .expect("metric can be created");
    static ref HTTP_RESPONSES: IntCounterVec = IntCounterVec::new(
        Opts::new("http_responses_total", "HTTP responses by status class"),
        &["class"]
    )
    .expect("metric can be created");
    static ref REGISTERED: bool = register_all();
}

fn register_all() -> bool {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ORDERS_SUBMITTED.clone()),
        Box::new(ORDERS_CANCELLED.clone()),
        Box::new(ORDER_TRANSITIONS.clone()),
        Box::new(PAYMENTS_SUBMITTED.clone()),
        Box::new(PAYMENTS_VERIFIED.clone()),
        Box::new(QUOTATION_EMAILS_FAILED.clone()),
        Box::new(HTTP_RESPONSES.clone()),
    ];

    collectors.into_iter().all(|collector| {
        REGISTRY
            .register(collector)
            .map_err(|e| error!(error = %e, "Failed to register metric"))
            .is_ok()
    })
}

/// Registers every collector with the service registry. Safe to call repeatedly.
pub fn init() -> bool {
    *REGISTERED
}

pub fn record_order_submitted() {
    ORDERS_SUBMITTED.inc();
}

pub fn record_order_cancelled() {
    ORDERS_CANCELLED.inc();
}

pub fn record_order_transition(status: &str) {
    ORDER_TRANSITIONS.with_label_values(&[status]).inc();
}

pub fn record_payment_submitted() {
    PAYMENTS_SUBMITTED.inc();
}

pub fn record_payment_verified() {
    PAYMENTS_VERIFIED.inc();
}

pub fn record_quotation_email_failed() {
    QUOTATION_EMAILS_FAILED.inc();
}

pub fn observe_request(status: u16) {
    let class = match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    };
    HTTP_RESPONSES.with_label_values(&[class]).inc();
}

/// Renders the registry in the Prometheus text exposition format.
pub fn render() -> Result<String, prometheus::Error> {
    init();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub async fn metrics_handler() -> Response {
    match render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_output_contains_recorded_counters() {
        record_order_submitted();
        record_order_transition("Scheduled");
        observe_request(404);

        let text = render().unwrap();
        assert!(text.contains("glazier_orders_submitted_total"));
        assert!(text.contains("glazier_order_transitions_total{status=\"Scheduled\"}"));
        assert!(text.contains("glazier_http_responses_total{class=\"4xx\"}"));
    }
}
