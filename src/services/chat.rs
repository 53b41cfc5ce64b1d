use crate::{
    auth::AuthUser,
    db::DbPool,
    entities::{
        conversation::{self, Entity as ConversationEntity},
        message::{self, Entity as MessageEntity},
        user::Entity as UserEntity,
    },
    errors::ServiceError,
    validation::not_blank,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Required for staff; customers always write to their own conversation
    pub conversation_id: Option<Uuid>,
    #[validate(custom = "not_blank", length(max = 2000, message = "Message is too long"))]
    pub content: String,
}

/// Polling cursor: only messages created after this instant are returned.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub after: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: conversation::Model,
    pub customer_name: String,
    /// Messages the viewer has not read yet
    pub unread_count: u64,
}

async fn load_conversation<C: ConnectionTrait>(
    conn: &C,
    conversation_id: Uuid,
    user: &AuthUser,
) -> Result<conversation::Model, ServiceError> {
    let found = ConversationEntity::find_by_id(conversation_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Conversation"))?;
    if !user.is_staff() && found.customer_id != user.id {
        return Err(ServiceError::Forbidden(
            "You do not have access to this conversation".to_string(),
        ));
    }
    Ok(found)
}

/// Customer support chat. Clients poll `fetch_messages` with an `after` cursor.
#[derive(Clone)]
pub struct ChatService {
    db_pool: Arc<DbPool>,
}

impl ChatService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list_conversations(&self, user: &AuthUser) -> Result<Vec<ConversationSummary>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = ConversationEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(conversation::Column::UpdatedAt);
        if !user.is_staff() {
            query = query.filter(conversation::Column::CustomerId.eq(user.id));
        }

        let mut summaries = Vec::new();
        for (conversation, customer) in query.all(db).await? {
            let unread_count = MessageEntity::find()
                .filter(message::Column::ConversationId.eq(conversation.id))
                .filter(message::Column::SenderId.ne(user.id))
                .filter(message::Column::IsRead.eq(false))
                .count(db)
                .await?;
            summaries.push(ConversationSummary {
                customer_name: customer.map(|c| c.name).unwrap_or_default(),
                conversation,
                unread_count,
            });
        }
        Ok(summaries)
    }

    #[instrument(skip(self, user, query), fields(user_id = %user.id, conversation_id = %conversation_id))]
    pub async fn fetch_messages(
        &self,
        user: &AuthUser,
        conversation_id: Uuid,
        query: MessageQuery,
    ) -> Result<Vec<message::Model>, ServiceError> {
        let db = &*self.db_pool;
        load_conversation(db, conversation_id, user).await?;

        let mut select = MessageEntity::find()
            .filter(message::Column::ConversationId.eq(conversation_id))
            .order_by_asc(message::Column::CreatedAt);
        if let Some(after) = query.after {
            select = select.filter(message::Column::CreatedAt.gt(after));
        }
        Ok(select.all(db).await?)
    }

    /// Sends a message. A customer's first message opens their conversation.
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn send_message(
        &self,
        user: &AuthUser,
        request: SendMessageRequest,
    ) -> Result<message::Model, ServiceError> {
        crate::validation::validate(&request)?;

        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for chat message");
            ServiceError::DatabaseError(e)
        })?;
        let now = Utc::now();

        let conversation = match (request.conversation_id, user.is_staff()) {
            (Some(id), _) => load_conversation(&txn, id, user).await?,
            (None, true) => {
                return Err(ServiceError::ValidationError(
                    "Please choose a conversation to reply to".to_string(),
                ))
            }
            (None, false) => {
                let existing = ConversationEntity::find()
                    .filter(conversation::Column::CustomerId.eq(user.id))
                    .one(&txn)
                    .await?;
                match existing {
                    Some(found) => found,
                    None => conversation::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        customer_id: Set(user.id),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| {
                        error!(error = %e, "Failed to open conversation");
                        ServiceError::DatabaseError(e)
                    })?,
                }
            }
        };

        let conversation_id = conversation.id;
        let sent = message::ActiveModel {
            id: Set(Uuid::new_v4()),
            conversation_id: Set(conversation_id),
            sender_id: Set(user.id),
            content: Set(request.content.trim().to_string()),
            is_read: Set(false),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, conversation_id = %conversation_id, "Failed to save message");
            ServiceError::DatabaseError(e)
        })?;

        let mut active: conversation::ActiveModel = conversation.into();
        active.updated_at = Set(now);
        active.update(&txn).await.map_err(|e| {
            error!(error = %e, conversation_id = %conversation_id, "Failed to bump conversation");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit chat message");
            ServiceError::DatabaseError(e)
        })?;

        info!(message_id = %sent.id, conversation_id = %conversation_id, "Message sent");
        Ok(sent)
    }

    /// Only the sender, or an admin, may delete a message.
    #[instrument(skip(self, user), fields(user_id = %user.id, message_id = %message_id))]
    pub async fn delete_message(&self, user: &AuthUser, message_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let found = MessageEntity::find_by_id(message_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message"))?;

        if found.sender_id != user.id && !user.is_admin() {
            warn!(message_id = %message_id, "Rejected delete of another user's message");
            return Err(ServiceError::Forbidden(
                "You can only delete your own messages".to_string(),
            ));
        }

        MessageEntity::delete_by_id(message_id).exec(db).await.map_err(|e| {
            error!(error = %e, message_id = %message_id, "Failed to delete message");
            ServiceError::DatabaseError(e)
        })?;
        Ok(())
    }

    /// Marks a received message read; senders cannot mark their own.
    #[instrument(skip(self, user), fields(user_id = %user.id, message_id = %message_id))]
    pub async fn mark_read(&self, user: &AuthUser, message_id: Uuid) -> Result<message::Model, ServiceError> {
        let db = &*self.db_pool;
        let found = MessageEntity::find_by_id(message_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message"))?;
        load_conversation(db, found.conversation_id, user).await?;

        if found.sender_id == user.id {
            return Err(ServiceError::Forbidden(
                "You cannot mark your own message as read".to_string(),
            ));
        }
        if found.is_read {
            return Ok(found);
        }

        let mut active: message::ActiveModel = found.into();
        active.is_read = Set(true);
        active.update(db).await.map_err(|e| {
            error!(error = %e, message_id = %message_id, "Failed to mark message read");
            ServiceError::DatabaseError(e)
        })
    }
}
