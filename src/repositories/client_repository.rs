use crate::models::client::Client;
use crate::utils::errors::{AppError, AppResult};
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Client>> {
    let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(client)
}

pub async fn find_by_tax_id(conn: &mut PgConnection, cpf_or_cnpj: &str) -> AppResult<Option<Client>> {
    let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE cpf_or_cnpj = $1")
        .bind(cpf_or_cnpj)
        .fetch_optional(conn)
        .await?;

    Ok(client)
}

pub async fn find_by_email(conn: &mut PgConnection, email: &str) -> AppResult<Option<Client>> {
    let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE email = $1")
        .bind(email)
        .fetch_optional(conn)
        .await?;

    Ok(client)
}

pub async fn find_by_phone(conn: &mut PgConnection, phone: &str) -> AppResult<Option<Client>> {
    let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE phone = $1")
        .bind(phone)
        .fetch_optional(conn)
        .await?;

    Ok(client)
}

pub struct NewClient<'a> {
    pub name: &'a str,
    pub cpf_or_cnpj: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub is_external: bool,
}

/// Campo duplicado detrás de cada constraint UNIQUE de la tabla
fn duplicate_field(constraint: &str) -> Option<&'static str> {
    match constraint {
        "clients_cpf_or_cnpj_key" => Some("cpf_or_cnpj"),
        "clients_email_key" => Some("email"),
        "clients_phone_key" => Some("phone"),
        _ => None,
    }
}

pub async fn insert(conn: &mut PgConnection, data: NewClient<'_>) -> AppResult<Client> {
    // Los chequeos previos del resolver pueden perder la carrera contra
    // un INSERT concurrente; la violación de UNIQUE se mapea al mismo
    // conflicto que habrían devuelto
    sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (id, name, cpf_or_cnpj, email, phone, address, is_external)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(data.name)
    .bind(data.cpf_or_cnpj)
    .bind(data.email)
    .bind(data.phone)
    .bind(data.address)
    .bind(data.is_external)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        let field = e
            .as_database_error()
            .and_then(|db| db.constraint())
            .and_then(duplicate_field);

        match field {
            Some(field) => AppError::conflict(
                "DUPLICATE_FIELD",
                Some(field),
                format!("A client with this {} already exists", field),
            ),
            None => AppError::Database(e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campo_duplicado_por_constraint() {
        assert_eq!(duplicate_field("clients_email_key"), Some("email"));
        assert_eq!(duplicate_field("clients_phone_key"), Some("phone"));
        assert_eq!(duplicate_field("clients_cpf_or_cnpj_key"), Some("cpf_or_cnpj"));
        assert_eq!(duplicate_field("vehicles_plate_key"), None);
    }
}
