use crate::{
    db::DbPool,
    entities::{
        staff::{self, Entity as StaffEntity},
        user::{self, Entity as UserEntity},
        UserRole,
    },
    errors::ServiceError,
    services::staff::set_role,
};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

/// Account administration
#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, filter))]
    pub async fn list_users(&self, filter: UserFilter) -> Result<Vec<user::Model>, ServiceError> {
        let mut query = UserEntity::find().order_by_asc(user::Column::CreatedAt);
        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role));
        }
        Ok(query.all(&*self.db_pool).await?)
    }

    /// Changes an account's role. Demoting to Customer removes the staff profile.
    #[instrument(skip(self, request), fields(acting_admin = %acting_admin, user_id = %user_id, role = request.role.as_str()))]
    pub async fn update_role(
        &self,
        acting_admin: Uuid,
        user_id: Uuid,
        request: UpdateRoleRequest,
    ) -> Result<user::Model, ServiceError> {
        if acting_admin == user_id {
            return Err(ServiceError::Forbidden(
                "You cannot change your own role".to_string(),
            ));
        }

        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for role change");
            ServiceError::DatabaseError(e)
        })?;

        let account = UserEntity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;
        let updated = set_role(&txn, account, request.role).await?;

        if request.role == UserRole::Customer {
            StaffEntity::delete_many()
                .filter(staff::Column::UserId.eq(user_id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    error!(error = %e, user_id = %user_id, "Failed to remove staff profile");
                    ServiceError::DatabaseError(e)
                })?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, user_id = %user_id, "Failed to commit role change");
            ServiceError::DatabaseError(e)
        })?;

        info!(user_id = %user_id, "User role updated");
        Ok(updated)
    }

    /// Deletes an account with everything it owns.
    #[instrument(skip(self), fields(acting_admin = %acting_admin, user_id = %user_id))]
    pub async fn delete_user(&self, acting_admin: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
        if acting_admin == user_id {
            return Err(ServiceError::Forbidden(
                "You cannot delete your own account".to_string(),
            ));
        }

        let result = UserEntity::delete_by_id(user_id)
            .exec(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %user_id, "Failed to delete user");
                ServiceError::DatabaseError(e)
            })?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("User"));
        }
        info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}
