use crate::{
    db::DbPool,
    entities::{
        material::{self, Entity as MaterialEntity},
        supplier::Entity as SupplierEntity,
    },
    errors::ServiceError,
    validation::{non_negative_amount, not_blank},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    UpdateMany,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

const DUPLICATE_MATERIAL: &str = "Material already exists for this supplier";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MaterialRequest {
    #[validate(custom = "not_blank", length(max = 100, message = "Name is too long"))]
    pub name: String,
    pub supplier_id: Uuid,
    #[validate(length(min = 1, max = 32, message = "Unit is required"))]
    pub unit: String,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
    #[validate(custom = "non_negative_amount")]
    pub unit_price: Decimal,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    #[serde(default)]
    pub reorder_level: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjustStockRequest {
    /// Positive to receive stock, negative to consume it
    pub delta: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct MaterialFilter {
    pub supplier_id: Option<Uuid>,
}

/// Inventory of raw materials
fn insufficient_stock(material: &material::Model) -> ServiceError {
    ServiceError::ValidationError(format!(
        "Insufficient stock: only {} {} available",
        material.quantity, material.unit
    ))
}

/// Applies `delta` to the stored quantity in place. A debit only matches while
/// enough stock remains.
fn apply_stock_delta(id: Uuid, delta: i32, now: DateTime<Utc>) -> UpdateMany<MaterialEntity> {
    let mut update = MaterialEntity::update_many()
        .col_expr(material::Column::Quantity, Expr::col(material::Column::Quantity).add(delta))
        .col_expr(material::Column::UpdatedAt, Expr::value(now))
        .filter(material::Column::Id.eq(id));
    if delta < 0 {
        update = update.filter(material::Column::Quantity.gte(delta.unsigned_abs()));
    }
    update
}

#[derive(Clone)]
pub struct MaterialService {
    db_pool: Arc<DbPool>,
}

impl MaterialService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(name = %request.name, supplier_id = %request.supplier_id))]
    pub async fn create_material(&self, request: MaterialRequest) -> Result<material::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let name = request.name.trim().to_string();
        self.ensure_supplier(request.supplier_id).await?;
        self.ensure_unique(&name, request.supplier_id, None).await?;

        let now = Utc::now();
        let model = material::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            supplier_id: Set(request.supplier_id),
            unit: Set(request.unit.trim().to_string()),
            quantity: Set(request.quantity),
            unit_price: Set(request.unit_price),
            reorder_level: Set(request.reorder_level),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create material");
            ServiceError::unique_violation(e, DUPLICATE_MATERIAL)
        })?;

        info!(material_id = %model.id, "Material created");
        Ok(model)
    }

    #[instrument(skip(self, request), fields(material_id = %id))]
    pub async fn update_material(&self, id: Uuid, request: MaterialRequest) -> Result<material::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let existing = self.get_material(id).await?;
        let name = request.name.trim().to_string();
        self.ensure_supplier(request.supplier_id).await?;
        self.ensure_unique(&name, request.supplier_id, Some(id)).await?;

        let mut active: material::ActiveModel = existing.into();
        active.name = Set(name);
        active.supplier_id = Set(request.supplier_id);
        active.unit = Set(request.unit.trim().to_string());
        active.quantity = Set(request.quantity);
        active.unit_price = Set(request.unit_price);
        active.reorder_level = Set(request.reorder_level);
        active.updated_at = Set(Utc::now());

        active.update(&*self.db_pool).await.map_err(|e| {
            error!(error = %e, material_id = %id, "Failed to update material");
            ServiceError::unique_violation(e, DUPLICATE_MATERIAL)
        })
    }

    /// Receives or consumes stock. Quantity never goes below zero.
    #[instrument(skip(self), fields(material_id = %id, delta = request.delta))]
    pub async fn adjust_stock(&self, id: Uuid, request: AdjustStockRequest) -> Result<material::Model, ServiceError> {
        let existing = self.get_material(id).await?;
        let next = existing
            .quantity
            .checked_add(request.delta)
            .ok_or_else(|| ServiceError::ValidationError("Stock adjustment is too large".to_string()))?;
        if next < 0 {
            return Err(insufficient_stock(&existing));
        }

        // The floor is part of the UPDATE, so concurrent debits cannot both pass it.
        let result = apply_stock_delta(id, request.delta, Utc::now())
            .exec(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, material_id = %id, "Failed to adjust stock");
                ServiceError::DatabaseError(e)
            })?;
        if result.rows_affected == 0 {
            let current = self.get_material(id).await?;
            return Err(insufficient_stock(&current));
        }

        let updated = self.get_material(id).await?;
        if updated.quantity <= updated.reorder_level {
            warn!(
                material_id = %id,
                quantity = updated.quantity,
                reorder_level = updated.reorder_level,
                "Material at or below reorder level"
            );
        }
        Ok(updated)
    }

    #[instrument(skip(self), fields(material_id = %id))]
    pub async fn delete_material(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = MaterialEntity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, material_id = %id, "Failed to delete material");
                ServiceError::DatabaseError(e)
            })?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Material"));
        }
        info!(material_id = %id, "Material deleted");
        Ok(())
    }

    pub async fn get_material(&self, id: Uuid) -> Result<material::Model, ServiceError> {
        MaterialEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Material"))
    }

    #[instrument(skip(self, filter))]
    pub async fn list_materials(&self, filter: MaterialFilter) -> Result<Vec<material::Model>, ServiceError> {
        let mut query = MaterialEntity::find().order_by_asc(material::Column::Name);
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(material::Column::SupplierId.eq(supplier_id));
        }
        Ok(query.all(&*self.db_pool).await?)
    }

    /// Materials whose quantity is at or below their reorder level.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<material::Model>, ServiceError> {
        Ok(MaterialEntity::find()
            .filter(Expr::col(material::Column::Quantity).lte(Expr::col(material::Column::ReorderLevel)))
            .order_by_asc(material::Column::Quantity)
            .all(&*self.db_pool)
            .await?)
    }

    async fn ensure_supplier(&self, supplier_id: Uuid) -> Result<(), ServiceError> {
        SupplierEntity::find_by_id(supplier_id)
            .one(&*self.db_pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("Supplier"))
    }

    async fn ensure_unique(&self, name: &str, supplier_id: Uuid, except: Option<Uuid>) -> Result<(), ServiceError> {
        let mut query = MaterialEntity::find()
            .filter(material::Column::Name.eq(name))
            .filter(material::Column::SupplierId.eq(supplier_id));
        if let Some(id) = except {
            query = query.filter(material::Column::Id.ne(id));
        }
        if query.one(&*self.db_pool).await?.is_some() {
            return Err(ServiceError::Conflict(DUPLICATE_MATERIAL.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn debit_keeps_the_floor_in_the_update() {
        let sql = apply_stock_delta(Uuid::new_v4(), -6, Utc::now())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""quantity" = "quantity" + "#), "{sql}");
        assert!(sql.contains(r#""quantity" >= 6"#), "{sql}");
    }

    #[test]
    fn receipt_has_no_floor() {
        let sql = apply_stock_delta(Uuid::new_v4(), 10, Utc::now())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""quantity" = "quantity" + 10"#), "{sql}");
        assert!(!sql.contains(">="), "{sql}");
    }
}
