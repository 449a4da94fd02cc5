use crate::models::notification::Notification;
use crate::utils::errors::AppResult;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub async fn insert(
    conn: &mut PgConnection,
    client_id: Uuid,
    order_id: Option<Uuid>,
    message: &str,
) -> AppResult<Notification> {
    let notification = sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (id, client_id, order_id, message, sent)
        VALUES ($1, $2, $3, $4, FALSE)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client_id)
    .bind(order_id)
    .bind(message)
    .fetch_one(conn)
    .await?;

    Ok(notification)
}

/// Confirmación de entrega: corre fuera de la transacción de negocio,
/// sobre el pool, después del commit.
pub async fn mark_sent(pool: &PgPool, id: Uuid) -> AppResult<()> {
    sqlx::query("UPDATE notifications SET sent = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn find_all(conn: &mut PgConnection) -> AppResult<Vec<Notification>> {
    let notifications = sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications ORDER BY created_at DESC",
    )
    .fetch_all(conn)
    .await?;

    Ok(notifications)
}

pub async fn find_by_client(conn: &mut PgConnection, client_id: Uuid) -> AppResult<Vec<Notification>> {
    let notifications = sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE client_id = $1 ORDER BY created_at DESC",
    )
    .bind(client_id)
    .fetch_all(conn)
    .await?;

    Ok(notifications)
}
