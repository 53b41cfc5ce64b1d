use crate::{
    auth::{AuthUser, StaffUser},
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, AppJson, AppPath, AppQuery},
    services::quotations::{CreateQuotationRequest, QuotationFilter, UpdateQuotationStatusRequest},
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, patch},
    Router,
};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new().route("/quotations", get(list_quotations).post(create_quotation))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/quotations/:id/status", patch(update_quotation_status))
}

pub async fn create_quotation(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateQuotationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let quotation = state
        .services
        .quotations
        .create_quotation(user.id, payload)
        .await?;
    Ok(created_response(quotation))
}

pub async fn list_quotations(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(filter): AppQuery<QuotationFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let quotations = state
        .services
        .quotations
        .list_quotations(&user, filter)
        .await?;
    Ok(success_response(quotations))
}

pub async fn update_quotation_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
    AppJson(payload): AppJson<UpdateQuotationStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let update = state.services.quotations.update_status(id, payload).await?;
    let message = if update.email_sent {
        "Quotation updated and customer emailed"
    } else {
        "Quotation updated, but the email to the customer could not be sent"
    };
    Ok(message_response(message, update))
}
