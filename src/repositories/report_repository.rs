use crate::models::service_report::ServiceReport;
use crate::utils::errors::AppResult;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn find_by_order(conn: &mut PgConnection, order_id: Uuid) -> AppResult<Option<ServiceReport>> {
    let report = sqlx::query_as::<_, ServiceReport>("SELECT * FROM service_reports WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(conn)
        .await?;

    Ok(report)
}

pub async fn insert(
    conn: &mut PgConnection,
    order_id: Uuid,
    description: &str,
) -> Result<ServiceReport, sqlx::Error> {
    // El UNIQUE de order_id garantiza el 1:1 con la orden; el caller
    // mapea la violación a REPORT_ALREADY_EXISTS
    sqlx::query_as::<_, ServiceReport>(
        r#"
        INSERT INTO service_reports (id, order_id, description)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(description)
    .fetch_one(conn)
    .await
}
