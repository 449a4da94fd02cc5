use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Reserva iniciada por el staff: el vehículo ya existe
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub vehicle_id: Uuid,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Reserva de autoservicio: cliente y vehículo llegan inline
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePublicAppointmentRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[validate(length(min = 10, message = "phone must have at least 10 digits"))]
    pub phone: String,

    #[validate(length(min = 11, message = "cpf_or_cnpj must have at least 11 digits"))]
    pub cpf_or_cnpj: String,

    #[validate(length(min = 1, message = "plate is required"))]
    pub plate: String,

    #[validate(length(min = 1, message = "brand is required"))]
    pub brand: String,

    #[validate(length(min = 1, message = "model is required"))]
    pub model: String,

    pub year: i32,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Query de disponibilidad: ?date=YYYY-MM-DD
#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: NaiveDate,
}
