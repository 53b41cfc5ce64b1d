use crate::{
    db::DbPool,
    entities::{
        material::{self, Entity as MaterialEntity},
        supplier::{self, Entity as SupplierEntity},
    },
    errors::ServiceError,
    validation::not_blank,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

const DUPLICATE_SUPPLIER: &str = "A supplier with this name already exists";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SupplierRequest {
    #[validate(custom = "not_blank", length(max = 100, message = "Name is too long"))]
    pub name: String,
    #[validate(custom = "not_blank", length(max = 100, message = "Contact person is too long"))]
    pub contact_person: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 7, max = 20, message = "Please enter a valid phone number"))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
}

impl SupplierService {
    /// Creates a new supplier service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a new supplier
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_supplier(&self, request: SupplierRequest) -> Result<supplier::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let name = request.name.trim().to_string();
        self.ensure_unique_name(&name, None).await?;

        let now = Utc::now();
        let model = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            contact_person: Set(request.contact_person.trim().to_string()),
            email: Set(request.email),
            phone: Set(request.phone),
            address: Set(request.address),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create supplier");
            ServiceError::unique_violation(e, DUPLICATE_SUPPLIER)
        })?;

        info!(supplier_id = %model.id, "Supplier created");
        Ok(model)
    }

    /// Updates an existing supplier
    #[instrument(skip(self, request), fields(supplier_id = %id))]
    pub async fn update_supplier(&self, id: Uuid, request: SupplierRequest) -> Result<supplier::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let existing = self.get_supplier(id).await?;
        let name = request.name.trim().to_string();
        self.ensure_unique_name(&name, Some(id)).await?;

        let mut active: supplier::ActiveModel = existing.into();
        active.name = Set(name);
        active.contact_person = Set(request.contact_person.trim().to_string());
        active.email = Set(request.email);
        active.phone = Set(request.phone);
        active.address = Set(request.address);
        active.updated_at = Set(Utc::now());

        active.update(&*self.db_pool).await.map_err(|e| {
            error!(error = %e, supplier_id = %id, "Failed to update supplier");
            ServiceError::unique_violation(e, DUPLICATE_SUPPLIER)
        })
    }

    /// Deletes a supplier that no material references
    #[instrument(skip(self), fields(supplier_id = %id))]
    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        self.get_supplier(id).await?;

        let materials = MaterialEntity::find()
            .filter(material::Column::SupplierId.eq(id))
            .count(db)
            .await?;
        if materials > 0 {
            return Err(ServiceError::Conflict(format!(
                "Supplier still provides {} material(s) and cannot be deleted",
                materials
            )));
        }

        SupplierEntity::delete_by_id(id).exec(db).await.map_err(|e| {
            error!(error = %e, supplier_id = %id, "Failed to delete supplier");
            ServiceError::DatabaseError(e)
        })?;
        info!(supplier_id = %id, "Supplier deleted");
        Ok(())
    }

    /// Gets a supplier by ID
    #[instrument(skip(self))]
    pub async fn get_supplier(&self, id: Uuid) -> Result<supplier::Model, ServiceError> {
        SupplierEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier"))
    }

    /// Lists suppliers alphabetically
    #[instrument(skip(self))]
    pub async fn list_suppliers(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        Ok(SupplierEntity::find()
            .order_by_asc(supplier::Column::Name)
            .all(&*self.db_pool)
            .await?)
    }

    async fn ensure_unique_name(&self, name: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
        let mut query = SupplierEntity::find().filter(supplier::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(supplier::Column::Id.ne(id));
        }
        if query.one(&*self.db_pool).await?.is_some() {
            return Err(ServiceError::Conflict(DUPLICATE_SUPPLIER.to_string()));
        }
        Ok(())
    }
}
