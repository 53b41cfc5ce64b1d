use crate::{
    auth::{AuthUser, StaffUser},
    errors::ServiceError,
    handlers::common::{created_response, success_response, AppJson},
    services::feedback::FeedbackRequest,
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/feedback", post(submit_feedback))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/feedback", get(list_feedback))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<FeedbackRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let feedback = state.services.feedback.submit(&user, payload).await?;
    Ok(created_response(feedback))
}

pub async fn list_feedback(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    let feedback = state.services.feedback.list().await?;
    Ok(success_response(feedback))
}
