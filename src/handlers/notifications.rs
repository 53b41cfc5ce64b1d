use crate::{
    auth::AuthUser,
    errors::ServiceError,
    handlers::common::{success_response, AppJson},
    services::notifications::MarkReadRequest,
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/read", post(mark_read))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let list = state.services.notifications.list_for_user(user.id).await?;
    Ok(success_response(list))
}

/// Body `{"ids": [...]}` marks those; an empty body object marks all.
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<MarkReadRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.notifications.mark_read(user.id, payload).await?;
    Ok(success_response(json!({ "updated": updated })))
}
