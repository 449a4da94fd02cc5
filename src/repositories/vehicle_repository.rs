use crate::models::{client::Client, vehicle::Vehicle};
use crate::utils::errors::AppResult;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(vehicle)
}

/// Lookup por matrícula normalizada (única en todo el sistema)
pub async fn find_by_plate(conn: &mut PgConnection, plate: &str) -> AppResult<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE plate = $1")
        .bind(plate)
        .fetch_optional(conn)
        .await?;

    Ok(vehicle)
}

/// Cliente dueño del vehículo (para notificaciones)
pub async fn find_owner(conn: &mut PgConnection, vehicle_id: Uuid) -> AppResult<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        SELECT c.* FROM clients c
        JOIN vehicles v ON v.client_id = c.id
        WHERE v.id = $1
        "#,
    )
    .bind(vehicle_id)
    .fetch_optional(conn)
    .await?;

    Ok(client)
}

pub struct NewVehicle<'a> {
    pub plate: &'a str,
    pub brand: &'a str,
    pub model: &'a str,
    pub year: i32,
    pub client_id: Uuid,
}

pub async fn insert(conn: &mut PgConnection, data: NewVehicle<'_>) -> AppResult<Vehicle> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        INSERT INTO vehicles (id, plate, brand, model, year, client_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(data.plate)
    .bind(data.brand)
    .bind(data.model)
    .bind(data.year)
    .bind(data.client_id)
    .fetch_one(conn)
    .await?;

    Ok(vehicle)
}
