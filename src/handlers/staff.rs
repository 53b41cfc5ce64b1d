use crate::{
    auth::AdminUser,
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, AppJson, AppPath},
    services::staff::{CreateStaffRequest, UpdateStaffRequest},
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use uuid::Uuid;

/// Admin-only staff management
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/staff", get(list_staff).post(create_staff))
        .route(
            "/staff/:id",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
}

pub async fn list_staff(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, ServiceError> {
    let staff = state.services.staff.list_staff().await?;
    Ok(success_response(staff))
}

pub async fn get_staff(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, ServiceError> {
    let member = state.services.staff.get_staff(id).await?;
    Ok(success_response(member))
}

pub async fn create_staff(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(payload): AppJson<CreateStaffRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let member = state.services.staff.create_staff(payload).await?;
    Ok(created_response(member))
}

pub async fn update_staff(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _admin: AdminUser,
    AppJson(payload): AppJson<UpdateStaffRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let profile = state.services.staff.update_staff(id, payload).await?;
    Ok(success_response(profile))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.staff.delete_staff(id).await?;
    Ok(message_response("Staff member removed", ()))
}
