use crate::{
    auth::{AuthUser, StaffUser},
    errors::ServiceError,
    handlers::common::{created_response, message_response, AppJson, AppPath},
    services::payments::{SubmitPaymentRequest, VerifyPaymentRequest},
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{patch, post},
    Router,
};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new().route("/orders/:id/payments", post(submit_payment))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/payments/:id/verify", patch(verify_payment))
}

/// Uploads proof of payment for an order
pub async fn submit_payment(
    State(state): State<AppState>,
    AppPath(order_id): AppPath<Uuid>,
    user: AuthUser,
    AppJson(payload): AppJson<SubmitPaymentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state
        .services
        .payments
        .submit_payment(order_id, &user, payload)
        .await?;
    Ok(created_response(payment))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    AppPath(payment_id): AppPath<Uuid>,
    StaffUser(staff): StaffUser,
    AppJson(payload): AppJson<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let verification = state
        .services
        .payments
        .verify_payment(payment_id, staff.id, payload)
        .await?;
    Ok(message_response("Payment verified", verification))
}
