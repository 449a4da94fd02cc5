//! Ciclo de vida de la orden de servicio
//!
//! Creación de la orden completa (cliente + vehículo + orden en una
//! transacción), máquina de estados con notificación en cada cambio
//! de valor, y coordinación de altas/bajas de fotos con la regla de
//! orden: remociones antes que adiciones, tope de 6 adjuntos.

use sqlx::{PgConnection, PgPool};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::dto::order_dto::{
    CreateFullOrderRequest, CreateFullOrderResponse, CreateOrderRequest, TrackingClientView,
    TrackingPhotoView, TrackingReportView, TrackingVehicleView, TrackingView, UpdateOrderRequest,
};
use crate::models::service_order::{OrderStatus, ServiceOrder};
use crate::repositories::{
    order_repository, order_repository::OrderListItem, photo_repository, report_repository,
    vehicle_repository,
};
use crate::services::notification_service::{NotificationService, PendingNotification};
use crate::services::entity_resolver;
use crate::storage::{PhotoStore, StoredFile, UploadedFile, MAX_PHOTOS_PER_ORDER};
use crate::utils::errors::{is_unique_violation, AppError, AppResult};

pub struct OrderService {
    pool: PgPool,
    notifications: NotificationService,
    storage: Arc<dyn PhotoStore>,
    app_url: String,
}

/// Transiciones permitidas de la máquina de estados. FINALIZED solo se
/// alcanza creando el reporte, nunca por patch directo.
fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    match (from, to) {
        (a, b) if a == b => true,
        (OrderStatus::Awaiting, OrderStatus::InProgress) => true,
        _ => false,
    }
}

/// Mensaje de creación con link público de seguimiento
fn creation_message(plate: &str, order_id: Uuid, app_url: &str) -> String {
    format!(
        "🚗 O veículo {} teve uma nova ordem de serviço criada.\n\nAcompanhe o andamento nesse link:\n\n{}/acompanhamento/{}",
        plate, app_url, order_id
    )
}

fn status_change_message(status: OrderStatus) -> String {
    format!("🔧 O status da ordem foi alterado para: {}", status.human_label())
}

impl OrderService {
    pub fn new(
        pool: PgPool,
        notifications: NotificationService,
        storage: Arc<dyn PhotoStore>,
        app_url: String,
    ) -> Self {
        Self { pool, notifications, storage, app_url }
    }

    /// Orden completa en una transacción: resolver cliente, resolver
    /// vehículo, rechazar orden abierta duplicada, crear la orden y
    /// registrar la notificación. Cliente sin teléfono aborta todo
    /// (postcondición dura del camino staff).
    pub async fn create_full(
        &self,
        req: CreateFullOrderRequest,
        files: Vec<UploadedFile>,
    ) -> AppResult<CreateFullOrderResponse> {
        req.validate()?;

        let mut tx = self.pool.begin().await?;

        let client = entity_resolver::resolve_or_create_client(
            &mut tx,
            &entity_resolver::ClientInput {
                client_id: req.client_id,
                name: req.name.as_deref(),
                email: req.email.as_deref(),
                phone: req.phone.as_deref(),
                address: req.address.as_deref(),
                cpf_or_cnpj: req.cpf_or_cnpj.as_deref(),
                is_external: false,
            },
        )
        .await?;

        let vehicle = entity_resolver::resolve_or_create_vehicle(
            &mut tx,
            &entity_resolver::VehicleInput {
                vehicle_id: req.vehicle_id,
                plate: req.plate.as_deref(),
                brand: req.brand.as_deref(),
                model: req.model.as_deref(),
                year: req.year,
            },
            client.id,
        )
        .await?;

        if order_repository::has_open_for_vehicle(&mut tx, vehicle.id).await? {
            return Err(AppError::conflict(
                "ORDER_ALREADY_EXISTS",
                Some("vehicle_id"),
                "Vehicle already has an open service order",
            ));
        }

        let order = order_repository::insert(
            &mut tx,
            vehicle.id,
            order_repository::NewOrder {
                fuel_level: req.fuel_level.map(|v| v.as_str()),
                adblue_level: req.adblue_level.map(|v| v.as_str()),
                km: req.km,
                tire_status: req.tire_status.map(|v| v.as_str()),
                mirror_status: req.mirror_status.map(|v| v.as_str()),
                painting_status: req.painting_status.map(|v| v.as_str()),
                complaints: &req.complaints,
                notes: req.notes.as_deref(),
            },
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "service_orders_open_vehicle_key") {
                AppError::conflict(
                    "ORDER_ALREADY_EXISTS",
                    Some("vehicle_id"),
                    "Vehicle already has an open service order",
                )
            } else {
                AppError::Database(e)
            }
        })?;

        if client.phone.trim().is_empty() {
            return Err(AppError::precondition(
                "MISSING_PHONE",
                Some("client.phone"),
                "Client has no phone number for the creation notification",
            ));
        }

        let message = creation_message(&vehicle.plate, order.id, &self.app_url);
        let pending = self
            .notifications
            .record(&mut tx, client.id, Some(order.id), &client.phone, &message)
            .await?;

        let attachments = attach_photos(&mut tx, self.storage.as_ref(), order.id, &files).await?;

        tx.commit().await?;

        self.persist_blobs(attachments).await;
        self.notifications.dispatch(pending);

        Ok(CreateFullOrderResponse {
            message: "Service order created successfully".to_string(),
            order_id: order.id,
        })
    }

    /// Creación simple contra un vehículo ya registrado. Misma
    /// postcondición dura que `create_full`: cliente sin teléfono
    /// aborta todo.
    pub async fn create(&self, req: CreateOrderRequest) -> AppResult<ServiceOrder> {
        req.validate()?;

        let mut tx = self.pool.begin().await?;

        let vehicle = vehicle_repository::find_by_id(&mut tx, req.vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("VEHICLE_NOT_FOUND", Some("vehicle_id"), "Vehicle not found")
            })?;

        if order_repository::has_open_for_vehicle(&mut tx, vehicle.id).await? {
            return Err(AppError::conflict(
                "ORDER_ALREADY_EXISTS",
                Some("vehicle_id"),
                "Vehicle already has an open service order",
            ));
        }

        let order = order_repository::insert(
            &mut tx,
            vehicle.id,
            order_repository::NewOrder {
                fuel_level: req.fuel_level.map(|v| v.as_str()),
                adblue_level: req.adblue_level.map(|v| v.as_str()),
                km: req.km,
                tire_status: req.tire_status.map(|v| v.as_str()),
                mirror_status: req.mirror_status.map(|v| v.as_str()),
                painting_status: req.painting_status.map(|v| v.as_str()),
                complaints: &req.complaints,
                notes: req.notes.as_deref(),
            },
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "service_orders_open_vehicle_key") {
                AppError::conflict(
                    "ORDER_ALREADY_EXISTS",
                    Some("vehicle_id"),
                    "Vehicle already has an open service order",
                )
            } else {
                AppError::Database(e)
            }
        })?;

        let owner = vehicle_repository::find_owner(&mut tx, vehicle.id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("CLIENT_NOT_FOUND", Some("vehicle_id"), "Vehicle has no client")
            })?;

        if owner.phone.trim().is_empty() {
            return Err(AppError::precondition(
                "MISSING_PHONE",
                Some("client.phone"),
                "Client has no phone number for the creation notification",
            ));
        }

        let message = creation_message(&vehicle.plate, order.id, &self.app_url);
        let pending = self
            .notifications
            .record(&mut tx, owner.id, Some(order.id), &owner.phone, &message)
            .await?;

        tx.commit().await?;
        self.notifications.dispatch(pending);

        Ok(order)
    }

    /// Patch de la orden con fotos: campos, comparación de status para
    /// notificar, remociones (validadas contra la orden) y recién
    /// después las adiciones.
    pub async fn update_with_photos(
        &self,
        id: Uuid,
        patch: UpdateOrderRequest,
        files: Vec<UploadedFile>,
    ) -> AppResult<ServiceOrder> {
        let mut tx = self.pool.begin().await?;

        let existing = order_repository::find_by_id(&mut tx, id).await?.ok_or_else(|| {
            AppError::not_found("ORDER_NOT_FOUND", Some("id"), "Service order not found")
        })?;

        // FINALIZED es terminal: ni status ni fotos se tocan
        if existing.is_finalized() {
            return Err(AppError::conflict(
                "ALREADY_FINALIZED",
                Some("id"),
                "Service order is finalized and can no longer change",
            ));
        }

        let old_status = existing
            .parsed_status()
            .ok_or_else(|| AppError::Internal(format!("Unknown order status '{}'", existing.status)))?;
        let new_status = patch.status.unwrap_or(old_status);

        if new_status == OrderStatus::Finalized {
            return Err(AppError::validation(
                "VALIDATION_ERROR",
                Some("status"),
                "FINALIZED is only reached by creating the service report",
            ));
        }

        if !can_transition(old_status, new_status) {
            return Err(AppError::conflict(
                "INVALID_STATUS_TRANSITION",
                Some("status"),
                format!(
                    "Cannot change status from {} to {}",
                    old_status.as_str(),
                    new_status.as_str()
                ),
            ));
        }

        let updated = order_repository::update(
            &mut tx,
            id,
            order_repository::OrderUpdate {
                status: new_status.as_str(),
                fuel_level: patch.fuel_level.map(|v| v.as_str()).unwrap_or(&existing.fuel_level),
                adblue_level: patch.adblue_level.map(|v| v.as_str()).unwrap_or(&existing.adblue_level),
                km: patch.km.unwrap_or(existing.km),
                tire_status: patch.tire_status.map(|v| v.as_str()).unwrap_or(&existing.tire_status),
                mirror_status: patch.mirror_status.map(|v| v.as_str()).unwrap_or(&existing.mirror_status),
                painting_status: patch
                    .painting_status
                    .map(|v| v.as_str())
                    .unwrap_or(&existing.painting_status),
                complaints: patch.complaints.as_deref().unwrap_or(&existing.complaints),
                notes: patch.notes.as_deref().unwrap_or(&existing.notes),
            },
        )
        .await?;

        // Solo un cambio de valor dispara notificación
        let pending = if new_status != old_status {
            self.record_order_notification(&mut tx, &updated, status_change_message(new_status))
                .await?
        } else {
            None
        };

        let mut removed_paths = Vec::new();
        for remove_id in patch.remove_photo_ids.unwrap_or_default() {
            let photo = photo_repository::find_by_id_and_order(&mut tx, remove_id, id)
                .await?
                .ok_or_else(|| {
                    AppError::validation(
                        "INVALID_PHOTO",
                        Some("remove_photo_ids"),
                        format!("Photo {} does not belong to this order", remove_id),
                    )
                })?;

            photo_repository::delete(&mut tx, photo.id).await?;
            removed_paths.push(photo.path);
        }

        let attachments = attach_photos(&mut tx, self.storage.as_ref(), id, &files).await?;

        tx.commit().await?;

        // Limpieza best-effort de blobs ya desreferenciados
        for path in removed_paths {
            match self.storage.delete(&path).await {
                Ok(true) => {}
                Ok(false) => warn!("Blob {} ya no existía al borrarlo", path),
                Err(e) => warn!("Error borrando blob {}: {}", path, e),
            }
        }

        self.persist_blobs(attachments).await;

        if let Some(pending) = pending {
            self.notifications.dispatch(pending);
        }

        Ok(updated)
    }

    /// Vista de seguimiento: orden + cliente + vehículo + reporte + fotos
    pub async fn get_tracking_view(&self, order_id: Uuid) -> AppResult<TrackingView> {
        let mut conn = self.pool.acquire().await?;

        let order = order_repository::find_by_id(&mut conn, order_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("ORDER_NOT_FOUND", Some("id"), "Service order not found")
            })?;

        let vehicle = vehicle_repository::find_by_id(&mut conn, order.vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("VEHICLE_NOT_FOUND", Some("vehicle_id"), "Vehicle not found")
            })?;

        let client = vehicle_repository::find_owner(&mut conn, vehicle.id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("CLIENT_NOT_FOUND", Some("vehicle_id"), "Vehicle has no client")
            })?;

        let report = report_repository::find_by_order(&mut conn, order_id).await?;
        let photos = photo_repository::find_by_order(&mut conn, order_id).await?;

        Ok(TrackingView {
            id: order.id,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
            fuel_level: order.fuel_level,
            adblue_level: order.adblue_level,
            km: order.km,
            tire_status: order.tire_status,
            mirror_status: order.mirror_status,
            painting_status: order.painting_status,
            complaints: order.complaints,
            client: TrackingClientView { name: client.name, phone: client.phone },
            vehicle: TrackingVehicleView {
                plate: vehicle.plate,
                brand: vehicle.brand,
                model: vehicle.model,
            },
            report: report.map(|r| TrackingReportView {
                description: r.description,
                created_at: r.created_at,
            }),
            photos: photos
                .into_iter()
                .map(|p| TrackingPhotoView {
                    id: p.id,
                    url: format!("{}/uploads/{}", self.app_url, p.filename),
                    filename: p.filename,
                })
                .collect(),
        })
    }

    pub async fn find_all(&self) -> AppResult<Vec<OrderListItem>> {
        let mut conn = self.pool.acquire().await?;
        order_repository::find_all(&mut conn).await
    }

    /// Notificación de orden al dueño del vehículo. Best-effort: sin
    /// teléfono solo se loguea.
    async fn record_order_notification(
        &self,
        conn: &mut PgConnection,
        order: &ServiceOrder,
        message: String,
    ) -> AppResult<Option<PendingNotification>> {
        let owner = match vehicle_repository::find_owner(conn, order.vehicle_id).await? {
            Some(owner) => owner,
            None => {
                warn!("Orden {} sin cliente asociado, no se notifica", order.id);
                return Ok(None);
            }
        };

        if owner.phone.trim().is_empty() {
            warn!("Cliente {} sin teléfono, no se notifica", owner.id);
            return Ok(None);
        }

        let pending = self
            .notifications
            .record(conn, owner.id, Some(order.id), &owner.phone, &message)
            .await?;

        Ok(Some(pending))
    }

    /// Escritura post-commit de los blobs recién adjuntados
    async fn persist_blobs(&self, attachments: Vec<(StoredFile, Vec<u8>)>) {
        for (stored, bytes) in attachments {
            if let Err(e) = self.storage.store(&stored, &bytes).await {
                warn!("Error escribiendo blob {}: {}", stored.path, e);
            }
        }
    }
}

/// Alta de fotos dentro de la transacción: valida el tope de adjuntos,
/// asigna nombre/ruta e inserta las filas. Los bytes se escriben a
/// disco recién después del commit.
pub(crate) async fn attach_photos(
    conn: &mut PgConnection,
    storage: &dyn PhotoStore,
    order_id: Uuid,
    files: &[UploadedFile],
) -> AppResult<Vec<(StoredFile, Vec<u8>)>> {
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let current = photo_repository::count_by_order(conn, order_id).await?;
    if current + files.len() as i64 > MAX_PHOTOS_PER_ORDER {
        return Err(AppError::validation(
            "PHOTO_LIMIT_EXCEEDED",
            Some("files"),
            format!("An order holds at most {} photos", MAX_PHOTOS_PER_ORDER),
        ));
    }

    let mut attachments = Vec::with_capacity(files.len());
    for file in files {
        let stored = storage.allocate(file)?;
        photo_repository::insert(conn, &stored.filename, &stored.path, order_id).await?;
        attachments.push((stored, file.bytes.clone()));
    }

    Ok(attachments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transiciones_validas() {
        assert!(can_transition(OrderStatus::Awaiting, OrderStatus::InProgress));
        assert!(can_transition(OrderStatus::Awaiting, OrderStatus::Awaiting));
        assert!(can_transition(OrderStatus::InProgress, OrderStatus::InProgress));
    }

    #[test]
    fn test_transiciones_invalidas() {
        // Retrocesos y saltos directos a FINALIZED quedan fuera
        assert!(!can_transition(OrderStatus::InProgress, OrderStatus::Awaiting));
        assert!(!can_transition(OrderStatus::Awaiting, OrderStatus::Finalized));
        assert!(!can_transition(OrderStatus::Finalized, OrderStatus::Awaiting));
    }

    #[test]
    fn test_mensaje_de_creacion_con_link() {
        let order_id = Uuid::nil();
        let message = creation_message("ABC1234", order_id, "https://app.oficina.com");

        assert!(message.contains("ABC1234"));
        assert!(message.contains(&format!("https://app.oficina.com/acompanhamento/{}", order_id)));
    }

    #[test]
    fn test_mensaje_de_cambio_de_status() {
        assert_eq!(
            status_change_message(OrderStatus::InProgress),
            "🔧 O status da ordem foi alterado para: Em andamento"
        );
    }
}
