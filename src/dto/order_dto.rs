use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::service_order::{
    AdblueLevel, FuelLevel, MirrorStatus, OrderStatus, PaintingStatus, TireStatus,
};

/// Creación de orden completa: cliente y vehículo pueden venir por id
/// o con los datos mínimos para crearlos en la misma transacción.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateFullOrderRequest {
    // Cliente
    pub client_id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub cpf_or_cnpj: Option<String>,

    // Vehículo
    pub vehicle_id: Option<Uuid>,
    pub plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,

    // Orden
    #[validate(length(min = 1, message = "complaints is required"))]
    pub complaints: String,
    pub notes: Option<String>,
    pub km: Option<i32>,
    pub fuel_level: Option<FuelLevel>,
    pub adblue_level: Option<AdblueLevel>,
    pub tire_status: Option<TireStatus>,
    pub mirror_status: Option<MirrorStatus>,
    pub painting_status: Option<PaintingStatus>,
}

/// Creación simple contra un vehículo ya registrado, sin fotos
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 1, message = "complaints is required"))]
    pub complaints: String,
    pub notes: Option<String>,
    pub km: Option<i32>,
    pub fuel_level: Option<FuelLevel>,
    pub adblue_level: Option<AdblueLevel>,
    pub tire_status: Option<TireStatus>,
    pub mirror_status: Option<MirrorStatus>,
    pub painting_status: Option<PaintingStatus>,
}

/// Patch de una orden. Los campos ausentes conservan su valor; las
/// fotos a remover se procesan antes de adjuntar las nuevas.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub fuel_level: Option<FuelLevel>,
    pub adblue_level: Option<AdblueLevel>,
    pub km: Option<i32>,
    pub tire_status: Option<TireStatus>,
    pub mirror_status: Option<MirrorStatus>,
    pub painting_status: Option<PaintingStatus>,
    pub complaints: Option<String>,
    pub notes: Option<String>,
    pub remove_photo_ids: Option<Vec<Uuid>>,
}

/// Resultado de la creación de orden completa
#[derive(Debug, Serialize)]
pub struct CreateFullOrderResponse {
    pub message: String,
    pub order_id: Uuid,
}

// ---- Vista de seguimiento ----

#[derive(Debug, Serialize)]
pub struct TrackingClientView {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct TrackingVehicleView {
    pub plate: String,
    pub brand: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct TrackingReportView {
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TrackingPhotoView {
    pub id: Uuid,
    pub filename: String,
    pub url: String,
}

/// Vista compuesta orden + vehículo + cliente + reporte + fotos
#[derive(Debug, Serialize)]
pub struct TrackingView {
    pub id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub fuel_level: String,
    pub adblue_level: String,
    pub km: i32,
    pub tire_status: String,
    pub mirror_status: String,
    pub painting_status: String,
    pub complaints: String,
    pub client: TrackingClientView,
    pub vehicle: TrackingVehicleView,
    pub report: Option<TrackingReportView>,
    pub photos: Vec<TrackingPhotoView>,
}
