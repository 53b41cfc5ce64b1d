use crate::{
    db::DbPool,
    entities::{
        order::Entity as OrderEntity,
        staff::Entity as StaffEntity,
        task::{self, Entity as TaskEntity},
        TaskStatus,
    },
    errors::ServiceError,
    validation::not_blank,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(custom = "not_blank", length(max = 200, message = "Title is too long"))]
    pub title: String,
    pub description: Option<String>,
    pub staff_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: Option<TaskStatus>,
}

/// Calendar window; a task matches when it overlaps `[from, to)`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub staff_id: Option<Uuid>,
}

fn check_window(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Result<(), ServiceError> {
    if end_at < start_at {
        return Err(ServiceError::ValidationError(
            "End time must be after the start time".to_string(),
        ));
    }
    Ok(())
}

/// Back-office project calendar
#[derive(Clone)]
pub struct TaskService {
    db_pool: Arc<DbPool>,
}

impl TaskService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_task(&self, request: TaskRequest) -> Result<task::Model, ServiceError> {
        crate::validation::validate(&request)?;
        check_window(request.start_at, request.end_at)?;
        self.check_references(&request).await?;

        let now = Utc::now();
        let model = task::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(request.title.trim().to_string()),
            description: Set(request.description),
            staff_id: Set(request.staff_id),
            order_id: Set(request.order_id),
            start_at: Set(request.start_at),
            end_at: Set(request.end_at),
            status: Set(request.status.unwrap_or(TaskStatus::ToDo)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create task");
            ServiceError::DatabaseError(e)
        })?;

        info!(task_id = %model.id, "Task created");
        Ok(model)
    }

    /// Full replacement; also used when a task is dragged to a new slot.
    #[instrument(skip(self, request), fields(task_id = %id))]
    pub async fn update_task(&self, id: Uuid, request: TaskRequest) -> Result<task::Model, ServiceError> {
        crate::validation::validate(&request)?;
        check_window(request.start_at, request.end_at)?;
        let existing = self.get_task(id).await?;
        self.check_references(&request).await?;

        let status = request.status.unwrap_or(existing.status);
        let mut active: task::ActiveModel = existing.into();
        active.title = Set(request.title.trim().to_string());
        active.description = Set(request.description);
        active.staff_id = Set(request.staff_id);
        active.order_id = Set(request.order_id);
        active.start_at = Set(request.start_at);
        active.end_at = Set(request.end_at);
        active.status = Set(status);
        active.updated_at = Set(Utc::now());

        active.update(&*self.db_pool).await.map_err(|e| {
            error!(error = %e, task_id = %id, "Failed to update task");
            ServiceError::DatabaseError(e)
        })
    }

    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete_task(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = TaskEntity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, task_id = %id, "Failed to delete task");
                ServiceError::DatabaseError(e)
            })?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Task"));
        }
        Ok(())
    }

    pub async fn get_task(&self, id: Uuid) -> Result<task::Model, ServiceError> {
        TaskEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task"))
    }

    #[instrument(skip(self, range))]
    pub async fn list_tasks(&self, range: TaskRange) -> Result<Vec<task::Model>, ServiceError> {
        if let (Some(from), Some(to)) = (range.from, range.to) {
            check_window(from, to)?;
        }

        let mut query = TaskEntity::find().order_by_asc(task::Column::StartAt);
        if let Some(to) = range.to {
            query = query.filter(task::Column::StartAt.lt(to));
        }
        if let Some(from) = range.from {
            query = query.filter(task::Column::EndAt.gt(from));
        }
        if let Some(staff_id) = range.staff_id {
            query = query.filter(task::Column::StaffId.eq(staff_id));
        }
        Ok(query.all(&*self.db_pool).await?)
    }

    async fn check_references(&self, request: &TaskRequest) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        if let Some(staff_id) = request.staff_id {
            StaffEntity::find_by_id(staff_id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Staff member"))?;
        }
        if let Some(order_id) = request.order_id {
            OrderEntity::find_by_id(order_id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Order"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    #[test]
    fn end_before_start_is_rejected() {
        let start = Utc::now();
        assert!(check_window(start, start).is_ok());
        assert!(check_window(start, start + Duration::hours(2)).is_ok());
        assert_matches!(
            check_window(start, start - Duration::minutes(1)),
            Err(ServiceError::ValidationError(msg)) if msg == "End time must be after the start time"
        );
    }
}
