use crate::{
    auth::StaffUser,
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, AppJson, AppPath, AppQuery},
    services::tasks::{TaskRange, TaskRequest},
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use uuid::Uuid;

/// Calendar tasks (back office)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

/// `?from=..&to=..` returns tasks overlapping the window
pub async fn list_tasks(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(range): AppQuery<TaskRange>,
) -> Result<impl IntoResponse, ServiceError> {
    let tasks = state.services.tasks.list_tasks(range).await?;
    Ok(success_response(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.services.tasks.get_task(id).await?;
    Ok(success_response(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppJson(payload): AppJson<TaskRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.services.tasks.create_task(payload).await?;
    Ok(created_response(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
    AppJson(payload): AppJson<TaskRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.services.tasks.update_task(id, payload).await?;
    Ok(success_response(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.tasks.delete_task(id).await?;
    Ok(message_response("Task deleted", ()))
}
