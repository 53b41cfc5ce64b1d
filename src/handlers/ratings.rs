use crate::{
    auth::AuthUser,
    errors::ServiceError,
    handlers::common::{created_response, success_response, AppJson, AppPath},
    services::ratings::SubmitRatingRequest,
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ratings/service", post(submit_rating))
        .route("/ratings/service/:service_id", get(service_ratings))
}

/// Public: summary and individual ratings for a service
pub async fn service_ratings(
    State(state): State<AppState>,
    AppPath(service_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let ratings = state.services.ratings.ratings_for_service(service_id).await?;
    Ok(success_response(ratings))
}

pub async fn submit_rating(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<SubmitRatingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let rating = state.services.ratings.submit_rating(&user, payload).await?;
    Ok(created_response(rating))
}
