use crate::{
    auth::{AuthUser, StaffUser},
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, AppJson, AppPath, AppQuery},
    services::orders::{CheckoutRequest, OrderFilter, ScheduleOrderRequest, SubmitOrderRequest},
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};
use uuid::Uuid;

/// Customer-facing order routes (mounted under `/api`)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(submit_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/cancel", patch(cancel_order))
        .route("/cart/checkout", post(checkout))
}

/// Staff order routes (mounted under `/api/admin`)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/:id", delete(delete_order))
        .route("/orders/:id/schedule", patch(schedule_order))
        .route("/orders/:id/complete", patch(complete_order))
}

pub async fn submit_order(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<SubmitOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.submit_order(user.id, payload).await?;
    Ok(created_response(order))
}

pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CheckoutRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let result = state.services.orders.checkout(user.id, payload).await?;
    Ok(created_response(result))
}

pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(filter): AppQuery<OrderFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let orders = state.services.orders.list_orders(&user, filter).await?;
    Ok(success_response(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state.services.orders.get_order(id, &user).await?;
    Ok(success_response(detail))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.cancel_order(id, &user).await?;
    Ok(message_response("Order cancelled successfully", order))
}

pub async fn schedule_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
    AppJson(payload): AppJson<ScheduleOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.schedule_order(id, payload).await?;
    Ok(message_response("Service scheduled", order))
}

pub async fn complete_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.complete_order(id).await?;
    Ok(message_response("Order completed", order))
}

pub async fn delete_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.orders.delete_order(id).await?;
    Ok(message_response("Order deleted", ()))
}
