use crate::{
    auth::AuthUser,
    db::DbPool,
    entities::{
        order::Entity as OrderEntity,
        order_item::Entity as OrderItemEntity,
        service::Entity as ServiceEntity,
        service_rating::{self, Entity as RatingEntity},
        OrderStatus,
    },
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

const ALREADY_RATED: &str = "You have already rated this service for this order";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRatingRequest {
    pub service_id: Uuid,
    pub order_id: Uuid,
    pub order_item_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(max = 1000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Mean rating to one decimal place; zero when unrated
    pub average: Decimal,
    pub count: u64,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[i16]) -> Self {
        if ratings.is_empty() {
            return Self {
                average: Decimal::ZERO,
                count: 0,
            };
        }
        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        let count = ratings.len() as u64;
        let average = (Decimal::from(sum) / Decimal::from(count)).round_dp(1);
        Self { average, count }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceRatings {
    pub summary: RatingSummary,
    pub ratings: Vec<service_rating::Model>,
}

pub(crate) async fn rating_summary<C: ConnectionTrait>(
    conn: &C,
    service_id: Uuid,
) -> Result<RatingSummary, ServiceError> {
    let ratings: Vec<i16> = RatingEntity::find()
        .filter(service_rating::Column::ServiceId.eq(service_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.rating)
        .collect();
    Ok(RatingSummary::from_ratings(&ratings))
}

#[derive(Clone)]
pub struct RatingService {
    db_pool: Arc<DbPool>,
}

impl RatingService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn ratings_for_service(&self, service_id: Uuid) -> Result<ServiceRatings, ServiceError> {
        let db = &*self.db_pool;
        ServiceEntity::find_by_id(service_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Service"))?;

        let ratings = RatingEntity::find()
            .filter(service_rating::Column::ServiceId.eq(service_id))
            .order_by_desc(service_rating::Column::CreatedAt)
            .all(db)
            .await?;
        let values: Vec<i16> = ratings.iter().map(|r| r.rating).collect();

        Ok(ServiceRatings {
            summary: RatingSummary::from_ratings(&values),
            ratings,
        })
    }

    /// One rating per delivered order line, by the customer who ordered it.
    #[instrument(skip(self, user, request), fields(user_id = %user.id, order_id = %request.order_id))]
    pub async fn submit_rating(
        &self,
        user: &AuthUser,
        request: SubmitRatingRequest,
    ) -> Result<service_rating::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let db = &*self.db_pool;

        let order = OrderEntity::find_by_id(request.order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order"))?;
        if order.customer_id != user.id {
            return Err(ServiceError::Forbidden(
                "You can only rate your own orders".to_string(),
            ));
        }
        if order.status != OrderStatus::Completed {
            return Err(ServiceError::ValidationError(
                "You can only rate completed orders".to_string(),
            ));
        }

        let item = OrderItemEntity::find_by_id(request.order_item_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order item"))?;
        if item.order_id != order.id || item.service_id != request.service_id {
            return Err(ServiceError::ValidationError(
                "This service is not part of the order".to_string(),
            ));
        }

        let existing = RatingEntity::find()
            .filter(service_rating::Column::OrderItemId.eq(item.id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(ALREADY_RATED.to_string()));
        }

        let model = service_rating::ActiveModel {
            id: Set(Uuid::new_v4()),
            service_id: Set(request.service_id),
            user_id: Set(user.id),
            order_id: Set(order.id),
            order_item_id: Set(item.id),
            rating: Set(request.rating),
            comment: Set(request.comment.filter(|c| !c.trim().is_empty())),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to save rating");
            ServiceError::unique_violation(e, ALREADY_RATED)
        })?;

        info!(rating_id = %model.id, rating = model.rating, "Service rated");
        Ok(model)
    }
}
