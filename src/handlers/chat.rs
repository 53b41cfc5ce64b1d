use crate::{
    auth::AuthUser,
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, AppJson, AppPath, AppQuery},
    services::chat::{MessageQuery, SendMessageRequest},
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, patch},
    Router,
};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(list_conversations).post(send_message))
        // `:id` is a conversation for GET and a message for DELETE
        .route("/messages/:id", get(fetch_messages).delete(delete_message))
        .route("/messages/:id/read", patch(mark_read))
}

pub async fn list_conversations(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let conversations = state.services.chat.list_conversations(&user).await?;
    Ok(success_response(conversations))
}

pub async fn fetch_messages(
    State(state): State<AppState>,
    AppPath(conversation_id): AppPath<Uuid>,
    user: AuthUser,
    AppQuery(query): AppQuery<MessageQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let messages = state
        .services
        .chat
        .fetch_messages(&user, conversation_id, query)
        .await?;
    Ok(success_response(messages))
}

pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<SendMessageRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let message = state.services.chat.send_message(&user, payload).await?;
    Ok(created_response(message))
}

pub async fn delete_message(
    State(state): State<AppState>,
    AppPath(message_id): AppPath<Uuid>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.chat.delete_message(&user, message_id).await?;
    Ok(message_response("Message deleted", ()))
}

pub async fn mark_read(
    State(state): State<AppState>,
    AppPath(message_id): AppPath<Uuid>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let message = state.services.chat.mark_read(&user, message_id).await?;
    Ok(success_response(message))
}
