use crate::{
    db::DbPool,
    entities::{
        staff::{self, Entity as StaffEntity},
        user::{self, Entity as UserEntity},
        UserRole,
    },
    errors::ServiceError,
    validation::not_blank,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

const DUPLICATE_PROFILE: &str = "This user already has a staff profile";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStaffRequest {
    pub user_id: Uuid,
    #[validate(custom = "not_blank", length(max = 100, message = "Position is too long"))]
    pub position: String,
    #[validate(length(min = 7, max = 20, message = "Please enter a valid contact number"))]
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStaffRequest {
    #[validate(custom = "not_blank", length(max = 100, message = "Position is too long"))]
    pub position: String,
    #[validate(length(min = 7, max = 20, message = "Please enter a valid contact number"))]
    pub contact_number: Option<String>,
    pub is_active: bool,
}

/// Staff profile joined with its account
#[derive(Debug, Serialize)]
pub struct StaffMember {
    #[serde(flatten)]
    pub staff: staff::Model,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

pub(crate) async fn set_role<C: ConnectionTrait>(
    conn: &C,
    user: user::Model,
    role: UserRole,
) -> Result<user::Model, ServiceError> {
    if user.role == role {
        return Ok(user);
    }
    let user_id = user.id;
    let mut active: user::ActiveModel = user.into();
    active.role = Set(role);
    active.updated_at = Set(Utc::now());
    active.update(conn).await.map_err(|e| {
        error!(error = %e, user_id = %user_id, "Failed to change user role");
        ServiceError::DatabaseError(e)
    })
}

/// Employee profiles. Creating one promotes the account to Staff; deleting it demotes
/// the account back to Customer. Admin accounts keep their role either way.
#[derive(Clone)]
pub struct StaffService {
    db_pool: Arc<DbPool>,
}

impl StaffService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn create_staff(&self, request: CreateStaffRequest) -> Result<StaffMember, ServiceError> {
        crate::validation::validate(&request)?;

        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for staff creation");
            ServiceError::DatabaseError(e)
        })?;

        let account = UserEntity::find_by_id(request.user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;

        let existing = StaffEntity::find()
            .filter(staff::Column::UserId.eq(account.id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(DUPLICATE_PROFILE.to_string()));
        }

        let now = Utc::now();
        let profile = staff::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(account.id),
            position: Set(request.position.trim().to_string()),
            contact_number: Set(request.contact_number),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create staff profile");
            ServiceError::unique_violation(e, DUPLICATE_PROFILE)
        })?;

        let account = if account.role == UserRole::Admin {
            account
        } else {
            set_role(&txn, account, UserRole::Staff).await?
        };

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit staff creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(staff_id = %profile.id, "Staff profile created");
        Ok(StaffMember {
            staff: profile,
            name: account.name,
            email: account.email,
            role: account.role,
        })
    }

    #[instrument(skip(self, request), fields(staff_id = %id))]
    pub async fn update_staff(&self, id: Uuid, request: UpdateStaffRequest) -> Result<staff::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let existing = StaffEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Staff member"))?;

        let mut active: staff::ActiveModel = existing.into();
        active.position = Set(request.position.trim().to_string());
        active.contact_number = Set(request.contact_number);
        active.is_active = Set(request.is_active);
        active.updated_at = Set(Utc::now());

        active.update(&*self.db_pool).await.map_err(|e| {
            error!(error = %e, staff_id = %id, "Failed to update staff profile");
            ServiceError::DatabaseError(e)
        })
    }

    #[instrument(skip(self), fields(staff_id = %id))]
    pub async fn delete_staff(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for staff deletion");
            ServiceError::DatabaseError(e)
        })?;

        let profile = StaffEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Staff member"))?;
        let account = UserEntity::find_by_id(profile.user_id).one(&txn).await?;

        StaffEntity::delete_by_id(id).exec(&txn).await.map_err(|e| {
            error!(error = %e, staff_id = %id, "Failed to delete staff profile");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(account) = account.filter(|a| a.role == UserRole::Staff) {
            set_role(&txn, account, UserRole::Customer).await?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit staff deletion");
            ServiceError::DatabaseError(e)
        })?;
        info!(staff_id = %id, "Staff profile deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_staff(&self) -> Result<Vec<StaffMember>, ServiceError> {
        let rows = StaffEntity::find()
            .find_also_related(UserEntity)
            .order_by_asc(staff::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(profile, account)| {
                account.map(|account| StaffMember {
                    staff: profile,
                    name: account.name,
                    email: account.email,
                    role: account.role,
                })
            })
            .collect())
    }

    pub async fn get_staff(&self, id: Uuid) -> Result<StaffMember, ServiceError> {
        let (profile, account) = StaffEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Staff member"))?;
        let account = account.ok_or_else(|| ServiceError::not_found("User"))?;
        Ok(StaffMember {
            staff: profile,
            name: account.name,
            email: account.email,
            role: account.role,
        })
    }
}
