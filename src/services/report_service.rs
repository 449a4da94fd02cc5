//! Finalización vía reporte de servicio
//!
//! Crear el reporte es el único disparador de la transición a
//! FINALIZED: status, reporte, fotos adjuntas y registro de la
//! notificación son efectos de una sola transacción.

use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::report_dto::CreateReportRequest;
use crate::models::service_order::OrderStatus;
use crate::models::service_report::ServiceReport;
use crate::repositories::{order_repository, report_repository, vehicle_repository};
use crate::services::notification_service::NotificationService;
use crate::services::order_service::attach_photos;
use crate::storage::{PhotoStore, UploadedFile};
use crate::utils::errors::{is_unique_violation, AppError, AppResult};

pub struct ReportService {
    pool: PgPool,
    notifications: NotificationService,
    storage: Arc<dyn PhotoStore>,
    app_url: String,
}

fn finalized_message(plate: &str, order_id: Uuid, app_url: &str) -> String {
    format!(
        "✅ O veículo {} teve sua ordem de serviço finalizada.\n\nConfira o relatório nesse link:\n\n{}/acompanhamento/{}",
        plate, app_url, order_id
    )
}

impl ReportService {
    pub fn new(
        pool: PgPool,
        notifications: NotificationService,
        storage: Arc<dyn PhotoStore>,
        app_url: String,
    ) -> Self {
        Self { pool, notifications, storage, app_url }
    }

    pub async fn create_and_finalize(
        &self,
        order_id: Uuid,
        req: CreateReportRequest,
        files: Vec<UploadedFile>,
    ) -> AppResult<ServiceReport> {
        req.validate()?;

        let mut tx = self.pool.begin().await?;

        let order = order_repository::find_by_id(&mut tx, order_id).await?.ok_or_else(|| {
            AppError::not_found("ORDER_NOT_FOUND", Some("order_id"), "Service order not found")
        })?;

        if order.is_finalized() {
            return Err(AppError::conflict(
                "ALREADY_FINALIZED",
                Some("order_id"),
                "Service order is already finalized",
            ));
        }

        if report_repository::find_by_order(&mut tx, order_id).await?.is_some() {
            return Err(AppError::conflict(
                "REPORT_ALREADY_EXISTS",
                Some("order_id"),
                "This service order already has a report",
            ));
        }

        order_repository::set_status(&mut tx, order_id, OrderStatus::Finalized).await?;

        let report = report_repository::insert(&mut tx, order_id, &req.description)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "service_reports_order_id_key") {
                    AppError::conflict(
                        "REPORT_ALREADY_EXISTS",
                        Some("order_id"),
                        "This service order already has a report",
                    )
                } else {
                    AppError::Database(e)
                }
            })?;

        let attachments = attach_photos(&mut tx, self.storage.as_ref(), order_id, &files).await?;

        // La notificación de finalización se registra en la misma
        // transacción; la entrega es best-effort post-commit
        let mut pending = None;
        if let Some(vehicle) = vehicle_repository::find_by_id(&mut tx, order.vehicle_id).await? {
            if let Some(owner) = vehicle_repository::find_owner(&mut tx, vehicle.id).await? {
                if !owner.phone.trim().is_empty() {
                    let message = finalized_message(&vehicle.plate, order_id, &self.app_url);
                    pending = Some(
                        self.notifications
                            .record(&mut tx, owner.id, Some(order_id), &owner.phone, &message)
                            .await?,
                    );
                }
            }
        }

        tx.commit().await?;

        for (stored, bytes) in attachments {
            if let Err(e) = self.storage.store(&stored, &bytes).await {
                tracing::warn!("Error escribiendo blob {}: {}", stored.path, e);
            }
        }

        if let Some(pending) = pending {
            self.notifications.dispatch(pending);
        }

        Ok(report)
    }

    pub async fn find_by_order(&self, order_id: Uuid) -> AppResult<ServiceReport> {
        let mut conn = self.pool.acquire().await?;

        report_repository::find_by_order(&mut conn, order_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "REPORT_NOT_FOUND",
                    Some("order_id"),
                    "No report exists for this service order",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mensaje_de_finalizacion() {
        let order_id = Uuid::nil();
        let message = finalized_message("ABC1234", order_id, "https://app.oficina.com");

        assert!(message.starts_with("✅ O veículo ABC1234"));
        assert!(message.contains(&format!("/acompanhamento/{}", order_id)));
    }
}
