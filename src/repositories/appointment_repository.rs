use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::utils::errors::AppResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Appointment>> {
    let appointment = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(appointment)
}

/// ¿Hay algún agendamiento dentro del bucket horario [start, end]?
pub async fn exists_in_range(
    conn: &mut PgConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM appointments WHERE date >= $1 AND date <= $2)",
    )
    .bind(start)
    .bind(end)
    .fetch_one(conn)
    .await?;

    Ok(exists)
}

/// Buckets ocupados de un día completo, en una sola query
pub async fn occupied_buckets(
    conn: &mut PgConnection,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
) -> AppResult<Vec<DateTime<Utc>>> {
    let buckets: Vec<DateTime<Utc>> = sqlx::query_scalar(
        "SELECT slot_bucket FROM appointments WHERE date >= $1 AND date <= $2",
    )
    .bind(day_start)
    .bind(day_end)
    .fetch_all(conn)
    .await?;

    Ok(buckets)
}

/// ¿El vehículo ya tiene un agendamiento futuro sin concluir?
pub async fn has_future_for_vehicle(conn: &mut PgConnection, vehicle_id: Uuid) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM appointments
            WHERE vehicle_id = $1 AND status = $2 AND date >= now()
        )
        "#,
    )
    .bind(vehicle_id)
    .bind(AppointmentStatus::Scheduled.as_str())
    .fetch_one(conn)
    .await?;

    Ok(exists)
}

pub async fn insert(
    conn: &mut PgConnection,
    vehicle_id: Uuid,
    date: DateTime<Utc>,
    slot_bucket: DateTime<Utc>,
    notes: Option<&str>,
) -> Result<Appointment, sqlx::Error> {
    // Devuelve sqlx::Error crudo: el caller mapea la violación del
    // UNIQUE de slot_bucket a TIME_SLOT_OCCUPIED
    sqlx::query_as::<_, Appointment>(
        r#"
        INSERT INTO appointments (id, vehicle_id, date, slot_bucket, notes, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(vehicle_id)
    .bind(date)
    .bind(slot_bucket)
    .bind(notes)
    .bind(AppointmentStatus::Scheduled.as_str())
    .fetch_one(conn)
    .await
}

pub async fn set_status(
    conn: &mut PgConnection,
    id: Uuid,
    status: AppointmentStatus,
) -> AppResult<()> {
    sqlx::query("UPDATE appointments SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .execute(conn)
        .await?;

    Ok(())
}

/// Fila de la agenda del taller (join con vehículo y cliente)
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AgendaItem {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub client_name: String,
}

pub async fn find_all(conn: &mut PgConnection) -> AppResult<Vec<AgendaItem>> {
    let items = sqlx::query_as::<_, AgendaItem>(
        r#"
        SELECT a.id, a.date, a.status, a.notes,
               v.plate, v.brand, v.model, c.name AS client_name
        FROM appointments a
        JOIN vehicles v ON v.id = a.vehicle_id
        JOIN clients c ON c.id = v.client_id
        ORDER BY a.date ASC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(items)
}
