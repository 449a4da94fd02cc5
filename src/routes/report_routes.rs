use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::report_dto::CreateReportRequest;
use crate::models::service_report::ServiceReport;
use crate::routes::parse_multipart;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/:order_id", post(create_and_finalize))
        .route("/:order_id", get(get_report))
}

async fn create_and_finalize(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ServiceReport>, AppError> {
    let (request, files) = parse_multipart::<CreateReportRequest>(multipart).await?;
    let report = state
        .report_service()
        .create_and_finalize(order_id, request, files)
        .await?;
    Ok(Json(report))
}

async fn get_report(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<ServiceReport>, AppError> {
    let report = state.report_service().find_by_order(order_id).await?;
    Ok(Json(report))
}
