use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Vehículo registrado. La matrícula se guarda normalizada
/// (mayúsculas, sin guiones) y es única en todo el sistema.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub client_id: Uuid,
    pub created_at: DateTime<Utc>,
}
