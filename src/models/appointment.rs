use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Estado de un agendamiento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Concluded,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Concluded => "CONCLUDED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SCHEDULED" => Some(AppointmentStatus::Scheduled),
            "CONCLUDED" => Some(AppointmentStatus::Concluded),
            _ => None,
        }
    }
}

/// Agendamiento: ocupa exactamente un slot horario del día laboral.
/// `slot_bucket` es la hora truncada del slot (UNIQUE en el schema,
/// defensa adicional contra doble reserva bajo escritores concurrentes).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: DateTime<Utc>,
    pub slot_bucket: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_concluded(&self) -> bool {
        AppointmentStatus::parse(&self.status) == Some(AppointmentStatus::Concluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        assert_eq!(
            AppointmentStatus::parse(AppointmentStatus::Scheduled.as_str()),
            Some(AppointmentStatus::Scheduled)
        );
        assert_eq!(AppointmentStatus::parse("???"), None);
    }
}
