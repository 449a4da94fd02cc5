use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Cliente del taller. El CPF/CNPJ se guarda normalizado (solo dígitos)
/// y es la identidad autoritativa; email y teléfono también son únicos.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub cpf_or_cnpj: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub is_external: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
