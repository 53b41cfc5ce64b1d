use crate::{
    auth::{clear_session_cookie, session_cookie, AuthUser, LoginRequest, RegisterRequest},
    entities::user,
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, AppJson},
    AppState,
};
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::info;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
}

/// Register handler
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let user: user::Model = state.auth.register(payload).await?;
    Ok(created_response(user))
}

/// Login handler; the token is returned in the body and as the session cookie
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let issued = state.auth.login(payload).await?;
    let cookie = session_cookie(&issued.token, issued.expires_in, state.auth.cookie_secure());
    info!(user_id = %issued.user.id, "User logged in");
    Ok(([(header::SET_COOKIE, cookie)], success_response(issued)))
}

pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        message_response("Logged out", ()),
    )
}

pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let profile = state.auth.current_user(user.id).await?;
    Ok(success_response(profile))
}
