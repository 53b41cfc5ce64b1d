use crate::{
    auth::AuthUser,
    db::DbPool,
    entities::feedback::{self, Entity as FeedbackEntity},
    errors::ServiceError,
    services::orders::find_accessible_order,
    validation::not_blank,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(custom = "not_blank", length(max = 2000, message = "Feedback is too long"))]
    pub message: String,
    pub order_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct FeedbackService {
    db_pool: Arc<DbPool>,
}

impl FeedbackService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn submit(&self, user: &AuthUser, request: FeedbackRequest) -> Result<feedback::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let db = &*self.db_pool;

        if let Some(order_id) = request.order_id {
            find_accessible_order(db, order_id, user).await?;
        }

        let model = feedback::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            order_id: Set(request.order_id),
            message: Set(request.message.trim().to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to save feedback");
            ServiceError::DatabaseError(e)
        })?;

        info!(feedback_id = %model.id, "Feedback received");
        Ok(model)
    }

    pub async fn list(&self) -> Result<Vec<feedback::Model>, ServiceError> {
        Ok(FeedbackEntity::find()
            .order_by_desc(feedback::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?)
    }
}
