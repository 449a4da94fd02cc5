use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::appointment_dto::{
    AvailableSlotsQuery, CreateAppointmentRequest, CreatePublicAppointmentRequest,
};
use crate::models::appointment::Appointment;
use crate::models::service_order::ServiceOrder;
use crate::repositories::appointment_repository::AgendaItem;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_appointment_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_appointment))
        .route("/", get(list_appointments))
        .route("/available-slots", get(available_slots))
        .route("/:id", get(get_appointment))
        .route("/:id/convert", post(convert_to_order))
}

/// Rutas públicas de autoservicio (sin autenticación)
pub fn create_public_appointment_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_public_appointment))
        .route("/available-slots", get(available_slots))
}

async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.appointment_service().create(request).await?;
    Ok(Json(appointment))
}

async fn create_public_appointment(
    State(state): State<AppState>,
    Json(request): Json<CreatePublicAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.appointment_service().create_public(request).await?;
    Ok(Json(appointment))
}

async fn available_slots(
    State(state): State<AppState>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let slots = state.appointment_service().available_slots(query.date).await?;
    Ok(Json(slots))
}

async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AgendaItem>>, AppError> {
    let items = state.appointment_service().find_all().await?;
    Ok(Json(items))
}

async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.appointment_service().find_one(id).await?;
    Ok(Json(appointment))
}

async fn convert_to_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceOrder>, AppError> {
    let order = state.appointment_service().convert_to_order(id).await?;
    Ok(Json(order))
}
