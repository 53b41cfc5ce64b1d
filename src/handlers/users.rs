use crate::{
    auth::AdminUser,
    errors::ServiceError,
    handlers::common::{message_response, success_response, AppJson, AppPath, AppQuery},
    services::users::{UpdateRoleRequest, UserFilter},
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{delete, get, patch},
    Router,
};
use uuid::Uuid;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/role", patch(update_role))
        .route("/users/:id", delete(delete_user))
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(filter): AppQuery<UserFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let users = state.services.users.list_users(filter).await?;
    Ok(success_response(users))
}

pub async fn update_role(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AdminUser(admin): AdminUser,
    AppJson(payload): AppJson<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.update_role(admin.id, id, payload).await?;
    Ok(success_response(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AdminUser(admin): AdminUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.users.delete_user(admin.id, id).await?;
    Ok(message_response("User deleted", ()))
}
