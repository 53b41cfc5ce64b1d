use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::notification::{self, Entity as NotificationEntity},
    errors::ServiceError,
};

/// Writes one notification row. Callers pass their open transaction so the
/// notification commits together with the state change it describes.
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    title: &str,
    message: String,
) -> Result<notification::Model, ServiceError> {
    notification::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        title: Set(title.to_string()),
        message: Set(message),
        is_read: Set(false),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %user_id, "Failed to create notification");
        ServiceError::DatabaseError(e)
    })
}

#[derive(Debug, Serialize)]
pub struct NotificationList {
    pub notifications: Vec<notification::Model>,
    pub unread_count: u64,
}

/// `ids` absent means "mark everything read".
#[derive(Debug, Default, Deserialize)]
pub struct MarkReadRequest {
    pub ids: Option<Vec<Uuid>>,
}

#[derive(Clone)]
pub struct NotificationService {
    db: Arc<DbPool>,
}

impl NotificationService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Newest first, with the number still unread.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<NotificationList, ServiceError> {
        let db = &*self.db;
        let notifications = NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(db)
            .await?;

        let unread_count = NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(db)
            .await?;

        Ok(NotificationList {
            notifications,
            unread_count,
        })
    }

    /// Marks the caller's notifications read; ids belonging to someone else are ignored.
    /// Returns how many rows changed.
    #[instrument(skip(self, request))]
    pub async fn mark_read(
        &self,
        user_id: Uuid,
        request: MarkReadRequest,
    ) -> Result<u64, ServiceError> {
        let mut update = NotificationEntity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false));

        if let Some(ids) = request.ids {
            if ids.is_empty() {
                return Ok(0);
            }
            update = update.filter(notification::Column::Id.is_in(ids));
        }

        let result = update.exec(&*self.db).await.map_err(|e| {
            error!(error = %e, "Failed to mark notifications read");
            ServiceError::DatabaseError(e)
        })?;

        info!(updated = result.rows_affected, "Notifications marked read");
        Ok(result.rows_affected)
    }
}
