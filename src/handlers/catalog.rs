use crate::{
    auth::StaffUser,
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, AppJson, AppPath, AppQuery},
    services::catalog::{ServiceFilter, ServiceRequest},
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

/// Public storefront listing
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services))
        .route("/services/:id", get(get_service))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_all_services).post(create_service))
        .route("/services/:id", put(update_service).delete(delete_service))
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

pub async fn list_services(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CategoryQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let services = state
        .services
        .catalog
        .list_services(ServiceFilter {
            category: query.category,
            include_unavailable: false,
        })
        .await?;
    Ok(success_response(services))
}

pub async fn get_service(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state.services.catalog.get_service(id).await?;
    Ok(success_response(detail))
}

pub async fn list_all_services(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<CategoryQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let services = state
        .services
        .catalog
        .list_services(ServiceFilter {
            category: query.category,
            include_unavailable: true,
        })
        .await?;
    Ok(success_response(services))
}

pub async fn create_service(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppJson(payload): AppJson<ServiceRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let service = state.services.catalog.create_service(payload).await?;
    Ok(created_response(service))
}

pub async fn update_service(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
    AppJson(payload): AppJson<ServiceRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let service = state.services.catalog.update_service(id, payload).await?;
    Ok(success_response(service))
}

pub async fn delete_service(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.catalog.delete_service(id).await?;
    Ok(message_response("Service deleted", ()))
}
