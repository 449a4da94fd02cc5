//! Calendario de slots
//!
//! El día laboral es la grilla fija de slots horarios de 08:00 a 17:00
//! inclusive, evaluada en el horario civil del taller (América/São
//! Paulo, UTC-3 fijo — sin horario de verano desde 2019) sin importar
//! el offset del caller. Un slot admite exactamente un agendamiento.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::repositories::appointment_repository;
use crate::utils::errors::{AppError, AppResult};

pub const OPENING_HOUR: u32 = 8;
pub const CLOSING_HOUR: u32 = 17;

const SHOP_UTC_OFFSET_HOURS: i32 = 3;

/// Offset fijo del taller
pub fn shop_offset() -> FixedOffset {
    FixedOffset::west_opt(SHOP_UTC_OFFSET_HOURS * 3600).expect("offset fijo válido")
}

/// Instante UTC visto en el horario civil del taller
pub fn to_shop_local(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&shop_offset())
}

pub fn is_weekend(local: &DateTime<FixedOffset>) -> bool {
    matches!(local.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

/// Inicio del bucket horario (HH:00:00.000 local) como instante UTC
pub fn bucket_start(local: &DateTime<FixedOffset>) -> DateTime<Utc> {
    let naive = local
        .date_naive()
        .and_hms_opt(local.hour(), 0, 0)
        .expect("hora del bucket válida");

    shop_offset()
        .from_local_datetime(&naive)
        .single()
        .expect("offset fijo sin ambigüedad")
        .with_timezone(&Utc)
}

/// Límites inclusivos del bucket: [HH:00:00.000, HH:59:59.999]
pub fn bucket_bounds(local: &DateTime<FixedOffset>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = bucket_start(local);
    let end = start + Duration::milliseconds(3_599_999);
    (start, end)
}

/// Bucket de una hora del día laboral, como instante UTC
fn hour_bucket(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    let naive = date.and_hms_opt(hour, 0, 0).expect("hora de grilla válida");

    shop_offset()
        .from_local_datetime(&naive)
        .single()
        .expect("offset fijo sin ambigüedad")
        .with_timezone(&Utc)
}

/// Grilla libre del día: los slots del expediente cuyo bucket no está
/// ocupado, en orden ascendente, formateados "HH:MM". Función pura.
pub fn free_slots(date: NaiveDate, occupied: &[DateTime<Utc>]) -> Vec<String> {
    (OPENING_HOUR..=CLOSING_HOUR)
        .filter(|hour| !occupied.contains(&hour_bucket(date, *hour)))
        .map(|hour| format!("{:02}:00", hour))
        .collect()
}

/// Weekday del día en el calendario del taller
fn date_is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

/// Slots disponibles de una fecha. Fines de semana devuelven lista vacía.
pub async fn available_slots(conn: &mut PgConnection, date: NaiveDate) -> AppResult<Vec<String>> {
    if date_is_weekend(date) {
        return Ok(Vec::new());
    }

    let day_start = hour_bucket(date, OPENING_HOUR);
    let day_end = hour_bucket(date, CLOSING_HOUR) + Duration::milliseconds(3_599_999);

    let occupied = appointment_repository::occupied_buckets(conn, day_start, day_end).await?;

    Ok(free_slots(date, &occupied))
}

/// Chequeos puros de calendario: el instante debe caer en una hora del
/// expediente y en día hábil. No toca la base.
pub fn validate_business_time(local: &DateTime<FixedOffset>) -> AppResult<()> {
    let hour = local.hour();
    if !(OPENING_HOUR..=CLOSING_HOUR).contains(&hour) {
        return Err(AppError::precondition(
            "OUT_OF_BUSINESS_HOURS",
            Some("date"),
            "Requested time is outside business hours (08h to 17h)",
        ));
    }

    if is_weekend(local) {
        return Err(AppError::precondition(
            "WEEKEND_NOT_ALLOWED",
            Some("date"),
            "Appointments are only available Monday to Friday",
        ));
    }

    Ok(())
}

/// Slot validado, listo para insertar
#[derive(Debug, Clone, Copy)]
pub struct ValidatedSlot {
    pub instant: DateTime<Utc>,
    pub bucket: DateTime<Utc>,
    pub local: DateTime<FixedOffset>,
}

/// Validación previa a la reserva. Debe ejecutarse en la misma
/// transacción que el INSERT para cerrar la ventana check-then-insert;
/// el UNIQUE de `slot_bucket` cubre el resto.
pub async fn validate_slot(
    conn: &mut PgConnection,
    vehicle_id: Uuid,
    instant: DateTime<Utc>,
) -> AppResult<ValidatedSlot> {
    let local = to_shop_local(instant);
    validate_business_time(&local)?;

    let (start, end) = bucket_bounds(&local);
    if appointment_repository::exists_in_range(conn, start, end).await? {
        return Err(AppError::conflict(
            "TIME_SLOT_OCCUPIED",
            Some("date"),
            "Time slot is already occupied",
        ));
    }

    if appointment_repository::has_future_for_vehicle(conn, vehicle_id).await? {
        return Err(AppError::conflict(
            "VEHICLE_ALREADY_SCHEDULED",
            Some("vehicle_id"),
            "Vehicle already has a future appointment",
        ));
    }

    Ok(ValidatedSlot { instant, bucket: start, local })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_to_shop_local_aplica_utc_menos_3() {
        // 13:00Z = 10:00 en el taller
        let local = to_shop_local(utc("2025-04-18T13:00:00Z"));
        assert_eq!(local.hour(), 10);
        assert_eq!(local.weekday(), chrono::Weekday::Fri);
    }

    #[test]
    fn test_bucket_bounds_inclusivos() {
        // 10:42 local cae en el bucket [10:00:00.000, 10:59:59.999]
        let local = to_shop_local(utc("2025-04-18T13:42:10Z"));
        let (start, end) = bucket_bounds(&local);

        assert_eq!(start, utc("2025-04-18T13:00:00Z"));
        assert_eq!(end, utc("2025-04-18T13:59:59.999Z"));
    }

    #[test]
    fn test_dos_instantes_del_mismo_bucket_comparten_inicio() {
        let a = to_shop_local(utc("2025-04-18T13:00:00Z"));
        let b = to_shop_local(utc("2025-04-18T13:59:59Z"));
        assert_eq!(bucket_start(&a), bucket_start(&b));
    }

    #[test]
    fn test_free_slots_grilla_completa() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 18).unwrap();
        let slots = free_slots(date, &[]);

        assert_eq!(slots.len(), 10);
        assert_eq!(slots.first().unwrap(), "08:00");
        assert_eq!(slots.last().unwrap(), "17:00");
    }

    #[test]
    fn test_free_slots_excluye_hora_ocupada() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 18).unwrap();
        // 10:00 local = 13:00Z
        let occupied = vec![utc("2025-04-18T13:00:00Z")];
        let slots = free_slots(date, &occupied);

        assert_eq!(slots.len(), 9);
        assert!(!slots.contains(&"10:00".to_string()));
        assert!(slots.contains(&"11:00".to_string()));
    }

    #[test]
    fn test_rechaza_fuera_del_horario_comercial() {
        // Viernes 07:00 en el taller (10:00Z), una hora antes de abrir
        let local = to_shop_local(utc("2025-04-18T10:00:00Z"));
        assert_eq!(local.hour(), 7);

        let err = validate_business_time(&local).unwrap_err();
        assert_eq!(err.code(), "OUT_OF_BUSINESS_HOURS");

        // Viernes 18:00 local, una hora después de cerrar
        let tarde = to_shop_local(utc("2025-04-18T21:00:00Z"));
        assert_eq!(validate_business_time(&tarde).unwrap_err().code(), "OUT_OF_BUSINESS_HOURS");
    }

    #[test]
    fn test_rechaza_fin_de_semana_en_horario_comercial() {
        // Sábado 10:00 en el taller (13:00Z): hora válida, día no
        let local = to_shop_local(utc("2025-04-19T13:00:00Z"));
        assert_eq!(local.hour(), 10);

        let err = validate_business_time(&local).unwrap_err();
        assert_eq!(err.code(), "WEEKEND_NOT_ALLOWED");
    }

    #[test]
    fn test_acepta_dia_habil_dentro_del_expediente() {
        let local = to_shop_local(utc("2025-04-18T13:00:00Z"));
        assert!(validate_business_time(&local).is_ok());

        // Los bordes de la grilla también son válidos
        let apertura = to_shop_local(utc("2025-04-18T11:00:00Z"));
        assert_eq!(apertura.hour(), OPENING_HOUR);
        assert!(validate_business_time(&apertura).is_ok());

        let cierre = to_shop_local(utc("2025-04-18T20:00:00Z"));
        assert_eq!(cierre.hour(), CLOSING_HOUR);
        assert!(validate_business_time(&cierre).is_ok());
    }

    #[test]
    fn test_sabado_es_fin_de_semana() {
        let local = to_shop_local(utc("2025-04-19T13:00:00Z"));
        assert!(is_weekend(&local));

        let viernes = to_shop_local(utc("2025-04-18T13:00:00Z"));
        assert!(!is_weekend(&viernes));
    }

    #[test]
    fn test_fin_de_semana_depende_del_horario_local() {
        // Sábado 01:00Z todavía es viernes 22:00 en el taller
        let local = to_shop_local(utc("2025-04-19T01:00:00Z"));
        assert_eq!(local.weekday(), chrono::Weekday::Fri);
        assert!(!is_weekend(&local));
    }
}
