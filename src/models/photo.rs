use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Foto adjunta a una orden de servicio. La fila se borra en la misma
/// transacción que decide el borrado; el blob se limpia después del commit.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub filename: String,
    pub path: String,
    pub order_id: Uuid,
    pub uploaded_at: DateTime<Utc>,
}
