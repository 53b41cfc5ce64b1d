//! Materials and suppliers (back office).

use crate::{
    auth::StaffUser,
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, AppJson, AppPath, AppQuery},
    services::{
        materials::{AdjustStockRequest, MaterialFilter, MaterialRequest},
        suppliers::SupplierRequest,
    },
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, patch},
    Router,
};
use uuid::Uuid;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/materials", get(list_materials).post(create_material))
        .route("/materials/low-stock", get(low_stock))
        .route(
            "/materials/:id",
            get(get_material).put(update_material).delete(delete_material),
        )
        .route("/materials/:id/stock", patch(adjust_stock))
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route(
            "/suppliers/:id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

pub async fn list_materials(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(filter): AppQuery<MaterialFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let materials = state.services.materials.list_materials(filter).await?;
    Ok(success_response(materials))
}

pub async fn low_stock(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    let materials = state.services.materials.low_stock().await?;
    Ok(success_response(materials))
}

pub async fn get_material(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    let material = state.services.materials.get_material(id).await?;
    Ok(success_response(material))
}

pub async fn create_material(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppJson(payload): AppJson<MaterialRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let material = state.services.materials.create_material(payload).await?;
    Ok(created_response(material))
}

pub async fn update_material(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
    AppJson(payload): AppJson<MaterialRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let material = state.services.materials.update_material(id, payload).await?;
    Ok(success_response(material))
}

pub async fn adjust_stock(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
    AppJson(payload): AppJson<AdjustStockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let material = state.services.materials.adjust_stock(id, payload).await?;
    Ok(success_response(material))
}

pub async fn delete_material(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.materials.delete_material(id).await?;
    Ok(message_response("Material deleted", ()))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    let suppliers = state.services.suppliers.list_suppliers().await?;
    Ok(success_response(suppliers))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.services.suppliers.get_supplier(id).await?;
    Ok(success_response(supplier))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppJson(payload): AppJson<SupplierRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.services.suppliers.create_supplier(payload).await?;
    Ok(created_response(supplier))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
    AppJson(payload): AppJson<SupplierRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.services.suppliers.update_supplier(id, payload).await?;
    Ok(success_response(supplier))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.suppliers.delete_supplier(id).await?;
    Ok(message_response("Supplier deleted", ()))
}
