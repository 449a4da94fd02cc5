use axum::{
    extract::{Multipart, Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::order_dto::{
    CreateFullOrderRequest, CreateFullOrderResponse, CreateOrderRequest, TrackingView,
    UpdateOrderRequest,
};
use crate::models::service_order::ServiceOrder;
use crate::repositories::order_repository::OrderListItem;
use crate::routes::parse_multipart;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/full", post(create_full_order))
        .route("/:id", get(get_order))
        .route("/:id", patch(update_order))
}

async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<ServiceOrder>, AppError> {
    let order = state.order_service().create(request).await?;
    Ok(Json(order))
}

async fn create_full_order(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CreateFullOrderResponse>, AppError> {
    let (request, files) = parse_multipart::<CreateFullOrderRequest>(multipart).await?;
    let response = state.order_service().create_full(request, files).await?;
    Ok(Json(response))
}

async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ServiceOrder>, AppError> {
    let (patch, files) = parse_multipart::<UpdateOrderRequest>(multipart).await?;
    let order = state.order_service().update_with_photos(id, patch, files).await?;
    Ok(Json(order))
}

async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderListItem>>, AppError> {
    let orders = state.order_service().find_all().await?;
    Ok(Json(orders))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrackingView>, AppError> {
    let view = state.order_service().get_tracking_view(id).await?;
    Ok(Json(view))
}
