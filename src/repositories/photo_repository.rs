use crate::models::photo::Photo;
use crate::utils::errors::AppResult;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn insert(
    conn: &mut PgConnection,
    filename: &str,
    path: &str,
    order_id: Uuid,
) -> AppResult<Photo> {
    let photo = sqlx::query_as::<_, Photo>(
        r#"
        INSERT INTO photos (id, filename, path, order_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(filename)
    .bind(path)
    .bind(order_id)
    .fetch_one(conn)
    .await?;

    Ok(photo)
}

/// Foto solo si pertenece a la orden dada
pub async fn find_by_id_and_order(
    conn: &mut PgConnection,
    id: Uuid,
    order_id: Uuid,
) -> AppResult<Option<Photo>> {
    let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1 AND order_id = $2")
        .bind(id)
        .bind(order_id)
        .fetch_optional(conn)
        .await?;

    Ok(photo)
}

pub async fn find_by_order(conn: &mut PgConnection, order_id: Uuid) -> AppResult<Vec<Photo>> {
    let photos = sqlx::query_as::<_, Photo>(
        "SELECT * FROM photos WHERE order_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;

    Ok(photos)
}

pub async fn count_by_order(conn: &mut PgConnection, order_id: Uuid) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos WHERE order_id = $1")
        .bind(order_id)
        .fetch_one(conn)
        .await?;

    Ok(count)
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM photos WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(())
}
