use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::models::notification::Notification;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_notification_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/client/:client_id", get(list_by_client))
}

async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let mut conn = state.pool.acquire().await?;
    let notifications = state.notification_service().find_all(&mut conn).await?;
    Ok(Json(notifications))
}

async fn list_by_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let mut conn = state.pool.acquire().await?;
    let notifications = state
        .notification_service()
        .find_by_client(&mut conn, client_id)
        .await?;
    Ok(Json(notifications))
}
