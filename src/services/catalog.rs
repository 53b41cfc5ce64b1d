use crate::{
    db::DbPool,
    entities::{
        order_item::{self, Entity as OrderItemEntity},
        service::{self, Entity as ServiceEntity},
        to_json_list,
    },
    errors::ServiceError,
    services::ratings::{rating_summary, RatingSummary},
    validation::{non_negative_amount, not_blank},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

const DUPLICATE_SERVICE: &str = "A service with this name already exists";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServiceRequest {
    #[validate(custom = "not_blank", length(max = 100, message = "Name is too long"))]
    pub name: String,
    #[validate(custom = "not_blank")]
    pub description: String,
    #[validate(length(min = 1, max = 50, message = "Category is required"))]
    pub category: String,
    #[validate(custom = "non_negative_amount")]
    pub price: Decimal,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceFilter {
    pub category: Option<String>,
    /// Include unavailable listings (back office)
    #[serde(default)]
    pub include_unavailable: bool,
}

#[derive(Debug, Serialize)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: service::Model,
    pub rating: RatingSummary,
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items.into_iter().map(|s| s.trim().to_string()) {
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Storefront service listings
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, filter))]
    pub async fn list_services(&self, filter: ServiceFilter) -> Result<Vec<service::Model>, ServiceError> {
        let mut query = ServiceEntity::find().order_by_asc(service::Column::Name);
        if !filter.include_unavailable {
            query = query.filter(service::Column::IsAvailable.eq(true));
        }
        if let Some(category) = filter.category {
            query = query.filter(service::Column::Category.eq(category));
        }
        Ok(query.all(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_service(&self, id: Uuid) -> Result<ServiceDetail, ServiceError> {
        let db = &*self.db_pool;
        let service = ServiceEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Service"))?;
        let rating = rating_summary(db, id).await?;
        Ok(ServiceDetail { service, rating })
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_service(&self, request: ServiceRequest) -> Result<service::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let name = request.name.trim().to_string();
        self.ensure_unique_name(&name, None).await?;

        let now = Utc::now();
        let model = service::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(request.description.trim().to_string()),
            category: Set(request.category.trim().to_string()),
            price: Set(request.price),
            colors: Set(to_json_list(clean_list(request.colors))),
            images: Set(to_json_list(clean_list(request.images))),
            is_available: Set(request.is_available),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create service");
            ServiceError::unique_violation(e, DUPLICATE_SERVICE)
        })?;

        info!(service_id = %model.id, "Service created");
        Ok(model)
    }

    #[instrument(skip(self, request), fields(service_id = %id))]
    pub async fn update_service(&self, id: Uuid, request: ServiceRequest) -> Result<service::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let existing = ServiceEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Service"))?;
        let name = request.name.trim().to_string();
        self.ensure_unique_name(&name, Some(id)).await?;

        let mut active: service::ActiveModel = existing.into();
        active.name = Set(name);
        active.description = Set(request.description.trim().to_string());
        active.category = Set(request.category.trim().to_string());
        active.price = Set(request.price);
        active.colors = Set(to_json_list(clean_list(request.colors)));
        active.images = Set(to_json_list(clean_list(request.images)));
        active.is_available = Set(request.is_available);
        active.updated_at = Set(Utc::now());

        active.update(&*self.db_pool).await.map_err(|e| {
            error!(error = %e, service_id = %id, "Failed to update service");
            ServiceError::unique_violation(e, DUPLICATE_SERVICE)
        })
    }

    /// Services already ordered cannot be deleted; mark them unavailable instead.
    #[instrument(skip(self), fields(service_id = %id))]
    pub async fn delete_service(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        ServiceEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Service"))?;

        let ordered = OrderItemEntity::find()
            .filter(order_item::Column::ServiceId.eq(id))
            .count(db)
            .await?;
        if ordered > 0 {
            return Err(ServiceError::Conflict(
                "This service has orders and cannot be deleted; mark it unavailable instead"
                    .to_string(),
            ));
        }

        ServiceEntity::delete_by_id(id).exec(db).await.map_err(|e| {
            error!(error = %e, service_id = %id, "Failed to delete service");
            ServiceError::DatabaseError(e)
        })?;
        info!(service_id = %id, "Service deleted");
        Ok(())
    }

    async fn ensure_unique_name(&self, name: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
        let mut query = ServiceEntity::find().filter(service::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(service::Column::Id.ne(id));
        }
        if query.one(&*self.db_pool).await?.is_some() {
            return Err(ServiceError::Conflict(DUPLICATE_SERVICE.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_trimmed_and_deduplicated() {
        assert_eq!(
            clean_list(vec![" Black ".into(), "".into(), "Black".into(), "Silver".into()]),
            vec!["Black", "Silver"]
        );
    }
}
