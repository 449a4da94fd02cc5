use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::dto::order_dto::TrackingView;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Vista pública de seguimiento referenciada en las notificaciones
pub fn create_tracking_router() -> Router<AppState> {
    Router::new().route("/:order_id", get(get_tracking))
}

async fn get_tracking(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<TrackingView>, AppError> {
    let view = state.order_service().get_tracking_view(order_id).await?;
    Ok(Json(view))
}
