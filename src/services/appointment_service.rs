//! Workflow de agendamientos
//!
//! Reserva de slots (staff y autoservicio) y conversión de un
//! agendamiento concluido en orden de servicio. La resolución de
//! entidades, la validación del slot y el INSERT corren en una sola
//! transacción; la entrega de la notificación queda para después del
//! commit.

use chrono::{DateTime, FixedOffset};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::appointment_dto::{CreateAppointmentRequest, CreatePublicAppointmentRequest};
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::service_order::ServiceOrder;
use crate::repositories::{
    appointment_repository, appointment_repository::AgendaItem, order_repository,
    vehicle_repository,
};
use crate::services::notification_service::NotificationService;
use crate::services::{entity_resolver, slot_calendar};
use crate::utils::errors::{is_unique_violation, AppError, AppResult};

pub struct AppointmentService {
    pool: PgPool,
    notifications: NotificationService,
}

/// Mensaje de confirmación con la fecha en horario local del taller
fn confirmation_message(client_name: &str, local: &DateTime<FixedOffset>) -> String {
    let date_str = local.format("%d/%m/%Y às %H:%M");
    format!(
        "Olá, {}! 📆 Seu agendamento foi confirmado para {}.",
        client_name, date_str
    )
}

impl AppointmentService {
    pub fn new(pool: PgPool, notifications: NotificationService) -> Self {
        Self { pool, notifications }
    }

    /// Reserva iniciada por el staff. La notificación es postcondición
    /// dura: un cliente sin teléfono aborta toda la operación.
    pub async fn create(&self, req: CreateAppointmentRequest) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await?;

        let vehicle = vehicle_repository::find_by_id(&mut tx, req.vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("VEHICLE_NOT_FOUND", Some("vehicle_id"), "Vehicle not found")
            })?;

        let slot = slot_calendar::validate_slot(&mut tx, vehicle.id, req.date).await?;

        let owner = vehicle_repository::find_owner(&mut tx, vehicle.id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("CLIENT_NOT_FOUND", Some("vehicle_id"), "Vehicle has no client")
            })?;

        if owner.phone.trim().is_empty() {
            return Err(AppError::precondition(
                "MISSING_CLIENT_PHONE",
                Some("client.phone"),
                "Client has no phone number for the booking confirmation",
            ));
        }

        let appointment = insert_appointment(&mut tx, vehicle.id, &slot, req.notes.as_deref()).await?;

        let message = confirmation_message(&owner.name, &slot.local);
        let pending = self
            .notifications
            .record(&mut tx, owner.id, None, &owner.phone, &message)
            .await?;

        tx.commit().await?;
        self.notifications.dispatch(pending);

        Ok(appointment)
    }

    /// Reserva de autoservicio: resuelve o crea cliente y vehículo con
    /// los datos inline; la notificación es best-effort y nunca
    /// bloquea la reserva.
    pub async fn create_public(
        &self,
        req: CreatePublicAppointmentRequest,
    ) -> AppResult<Appointment> {
        req.validate()?;

        let mut tx = self.pool.begin().await?;

        let client = entity_resolver::resolve_or_create_client(
            &mut tx,
            &entity_resolver::ClientInput {
                name: Some(&req.name),
                phone: Some(&req.phone),
                cpf_or_cnpj: Some(&req.cpf_or_cnpj),
                is_external: true,
                ..Default::default()
            },
        )
        .await?;

        let vehicle = entity_resolver::resolve_or_create_vehicle(
            &mut tx,
            &entity_resolver::VehicleInput {
                plate: Some(&req.plate),
                brand: Some(&req.brand),
                model: Some(&req.model),
                year: Some(req.year),
                ..Default::default()
            },
            client.id,
        )
        .await?;

        let slot = slot_calendar::validate_slot(&mut tx, vehicle.id, req.date).await?;
        let appointment = insert_appointment(&mut tx, vehicle.id, &slot, req.notes.as_deref()).await?;

        // Best-effort: sin teléfono simplemente no se notifica
        let pending = if client.phone.trim().is_empty() {
            None
        } else {
            let message = confirmation_message(&client.name, &slot.local);
            Some(
                self.notifications
                    .record(&mut tx, client.id, None, &client.phone, &message)
                    .await?,
            )
        };

        tx.commit().await?;

        if let Some(pending) = pending {
            self.notifications.dispatch(pending);
        }

        Ok(appointment)
    }

    /// Convierte un agendamiento en orden de servicio con los valores
    /// de inspección placeholder, marcándolo CONCLUDED en la misma
    /// transacción (las dos escrituras son atómicas).
    pub async fn convert_to_order(&self, appointment_id: Uuid) -> AppResult<ServiceOrder> {
        let mut tx = self.pool.begin().await?;

        let appointment = appointment_repository::find_by_id(&mut tx, appointment_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("APPOINTMENT_NOT_FOUND", Some("id"), "Appointment not found")
            })?;

        if appointment.is_concluded() {
            return Err(AppError::conflict(
                "ALREADY_CONCLUDED",
                Some("id"),
                "This appointment was already concluded",
            ));
        }

        let order = order_repository::insert(
            &mut tx,
            appointment.vehicle_id,
            order_repository::NewOrder {
                complaints: appointment.notes.as_deref().unwrap_or(""),
                ..Default::default()
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

        appointment_repository::set_status(&mut tx, appointment.id, AppointmentStatus::Concluded)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    pub async fn available_slots(&self, date: chrono::NaiveDate) -> AppResult<Vec<String>> {
        let mut conn = self.pool.acquire().await?;
        slot_calendar::available_slots(&mut conn, date).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<AgendaItem>> {
        let mut conn = self.pool.acquire().await?;
        appointment_repository::find_all(&mut conn).await
    }

    pub async fn find_one(&self, id: Uuid) -> AppResult<Appointment> {
        let mut conn = self.pool.acquire().await?;

        appointment_repository::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("APPOINTMENT_NOT_FOUND", Some("id"), "Appointment not found")
            })
    }
}

/// Conflicto de dominio detrás de cada constraint UNIQUE de la tabla
/// de agendamientos
fn appointment_conflict(constraint: &str) -> Option<AppError> {
    match constraint {
        "appointments_slot_bucket_key" => Some(AppError::conflict(
            "TIME_SLOT_OCCUPIED",
            Some("date"),
            "Time slot is already occupied",
        )),
        "appointments_open_vehicle_key" => Some(AppError::conflict(
            "VEHICLE_ALREADY_SCHEDULED",
            Some("vehicle_id"),
            "Vehicle already has a future appointment",
        )),
        _ => None,
    }
}

/// INSERT del agendamiento mapeando las violaciones de UNIQUE a sus
/// conflictos: dos validaciones concurrentes pueden pasar, pero solo
/// un INSERT gana, sea por el slot o por el vehículo.
async fn insert_appointment(
    conn: &mut sqlx::PgConnection,
    vehicle_id: Uuid,
    slot: &slot_calendar::ValidatedSlot,
    notes: Option<&str>,
) -> AppResult<Appointment> {
    appointment_repository::insert(conn, vehicle_id, slot.instant, slot.bucket, notes)
        .await
        .map_err(|e| {
            let conflict = e
                .as_database_error()
                .and_then(|db| db.constraint())
                .and_then(appointment_conflict);

            match conflict {
                Some(conflict) => conflict,
                None => AppError::Database(e),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::slot_calendar::to_shop_local;

    #[test]
    fn test_conflicto_por_constraint_de_agendamiento() {
        assert_eq!(
            appointment_conflict("appointments_slot_bucket_key").unwrap().code(),
            "TIME_SLOT_OCCUPIED"
        );
        assert_eq!(
            appointment_conflict("appointments_open_vehicle_key").unwrap().code(),
            "VEHICLE_ALREADY_SCHEDULED"
        );
        assert!(appointment_conflict("appointments_pkey").is_none());
    }

    #[test]
    fn test_mensaje_de_confirmacion_en_horario_local() {
        // 14:00 local = 17:00Z
        let local = to_shop_local("2025-04-18T17:00:00Z".parse().unwrap());
        let message = confirmation_message("Maria", &local);

        assert_eq!(
            message,
            "Olá, Maria! 📆 Seu agendamento foi confirmado para 18/04/2025 às 14:00."
        );
    }
}
