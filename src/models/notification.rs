use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Notificación registrada para un cliente. Se crea con `sent = false`
/// dentro de la transacción de negocio y pasa a `sent = true` solo con
/// entrega confirmada; un fallo de entrega nunca revierte la fila.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub client_id: Uuid,
    pub order_id: Option<Uuid>,
    pub message: String,
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}
