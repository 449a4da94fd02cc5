use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Reporte de servicio: 1:1 con una orden finalizada. Su creación es
/// el único disparador de la transición a FINALIZED.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ServiceReport {
    pub id: Uuid,
    pub order_id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
