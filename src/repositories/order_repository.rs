use crate::models::service_order::{OrderStatus, ServiceOrder};
use crate::utils::errors::AppResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<ServiceOrder>> {
    let order = sqlx::query_as::<_, ServiceOrder>("SELECT * FROM service_orders WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(order)
}

/// ¿El vehículo ya tiene una orden abierta (AWAITING o IN_PROGRESS)?
pub async fn has_open_for_vehicle(conn: &mut PgConnection, vehicle_id: Uuid) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM service_orders
            WHERE vehicle_id = $1 AND status IN ($2, $3)
        )
        "#,
    )
    .bind(vehicle_id)
    .bind(OrderStatus::Awaiting.as_str())
    .bind(OrderStatus::InProgress.as_str())
    .fetch_one(conn)
    .await?;

    Ok(exists)
}

/// Campos de inspección de una orden nueva. Los `None` quedan en los
/// defaults del schema.
#[derive(Debug, Default)]
pub struct NewOrder<'a> {
    pub fuel_level: Option<&'a str>,
    pub adblue_level: Option<&'a str>,
    pub km: Option<i32>,
    pub tire_status: Option<&'a str>,
    pub mirror_status: Option<&'a str>,
    pub painting_status: Option<&'a str>,
    pub complaints: &'a str,
    pub notes: Option<&'a str>,
}

pub async fn insert(
    conn: &mut PgConnection,
    vehicle_id: Uuid,
    data: NewOrder<'_>,
) -> Result<ServiceOrder, sqlx::Error> {
    // COALESCE contra los defaults del schema; el caller mapea la
    // violación del índice parcial de orden abierta a ORDER_ALREADY_EXISTS
    sqlx::query_as::<_, ServiceOrder>(
        r#"
        INSERT INTO service_orders
            (id, vehicle_id, status, fuel_level, adblue_level, km,
             tire_status, mirror_status, painting_status, complaints, notes)
        VALUES
            ($1, $2, $3,
             COALESCE($4, 'RESERVA'),
             COALESCE($5, 'VAZIO'),
             COALESCE($6, 0),
             COALESCE($7, 'RUIM'),
             COALESCE($8, 'OK'),
             COALESCE($9, 'INTACTA'),
             $10,
             COALESCE($11, ''))
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(vehicle_id)
    .bind(OrderStatus::Awaiting.as_str())
    .bind(data.fuel_level)
    .bind(data.adblue_level)
    .bind(data.km)
    .bind(data.tire_status)
    .bind(data.mirror_status)
    .bind(data.painting_status)
    .bind(data.complaints)
    .bind(data.notes)
    .fetch_one(conn)
    .await
}

/// Actualización por reemplazo completo: el service carga la orden
/// actual y resuelve cada campo antes de llamar aquí.
pub struct OrderUpdate<'a> {
    pub status: &'a str,
    pub fuel_level: &'a str,
    pub adblue_level: &'a str,
    pub km: i32,
    pub tire_status: &'a str,
    pub mirror_status: &'a str,
    pub painting_status: &'a str,
    pub complaints: &'a str,
    pub notes: &'a str,
}

pub async fn update(
    conn: &mut PgConnection,
    id: Uuid,
    data: OrderUpdate<'_>,
) -> AppResult<ServiceOrder> {
    let order = sqlx::query_as::<_, ServiceOrder>(
        r#"
        UPDATE service_orders
        SET status = $2, fuel_level = $3, adblue_level = $4, km = $5,
            tire_status = $6, mirror_status = $7, painting_status = $8,
            complaints = $9, notes = $10, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(data.status)
    .bind(data.fuel_level)
    .bind(data.adblue_level)
    .bind(data.km)
    .bind(data.tire_status)
    .bind(data.mirror_status)
    .bind(data.painting_status)
    .bind(data.complaints)
    .bind(data.notes)
    .fetch_one(conn)
    .await?;

    Ok(order)
}

pub async fn set_status(conn: &mut PgConnection, id: Uuid, status: OrderStatus) -> AppResult<()> {
    sqlx::query("UPDATE service_orders SET status = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .execute(conn)
        .await?;

    Ok(())
}

/// Fila del listado de órdenes (join con vehículo y cliente)
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct OrderListItem {
    pub id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub client_name: String,
}

pub async fn find_all(conn: &mut PgConnection) -> AppResult<Vec<OrderListItem>> {
    let items = sqlx::query_as::<_, OrderListItem>(
        r#"
        SELECT o.id, o.status, o.created_at,
               v.plate, v.brand, v.model, v.year, c.name AS client_name
        FROM service_orders o
        JOIN vehicles v ON v.id = o.vehicle_id
        JOIN clients c ON c.id = v.client_id
        ORDER BY o.created_at DESC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(items)
}
