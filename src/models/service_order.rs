//! Orden de servicio y sus enumeraciones cerradas
//!
//! La máquina de estados es AWAITING → IN_PROGRESS → FINALIZED
//! (con salto directo AWAITING → FINALIZED). FINALIZED es terminal
//! y solo se entra creando el reporte de servicio.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Estado de la orden de servicio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Awaiting,
    InProgress,
    Finalized,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Awaiting => "AWAITING",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Finalized => "FINALIZED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "AWAITING" => Some(OrderStatus::Awaiting),
            "IN_PROGRESS" => Some(OrderStatus::InProgress),
            "FINALIZED" => Some(OrderStatus::Finalized),
            _ => None,
        }
    }

    /// Etiqueta legible para las notificaciones al cliente
    pub fn human_label(&self) -> &'static str {
        match self {
            OrderStatus::Awaiting => "Aguardando",
            OrderStatus::InProgress => "Em andamento",
            OrderStatus::Finalized => "Finalizado",
        }
    }
}

macro_rules! closed_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($text => Some($name::$variant)),+,
                    _ => None,
                }
            }
        }
    };
}

closed_enum! {
    /// Nivel de combustible en la inspección de entrada
    FuelLevel {
        Reserva => "RESERVA",
        Quarto => "QUARTO",
        Metade => "METADE",
        TresQuartos => "TRES_QUARTOS",
        Cheio => "CHEIO",
    }
}

closed_enum! {
    /// Nivel de AdBlue
    AdblueLevel {
        Vazio => "VAZIO",
        Baixo => "BAIXO",
        Metade => "METADE",
        Cheio => "CHEIO",
    }
}

closed_enum! {
    /// Estado de los neumáticos
    TireStatus {
        Ruim => "RUIM",
        Regular => "REGULAR",
        Bom => "BOM",
        Novo => "NOVO",
    }
}

closed_enum! {
    /// Estado de los retrovisores
    MirrorStatus {
        Ok => "OK",
        Quebrado => "QUEBRADO",
        Rachado => "RACHADO",
        Faltando => "FALTANDO",
    }
}

closed_enum! {
    /// Estado de la pintura
    PaintingStatus {
        Intacta => "INTACTA",
        Arranhada => "ARRANHADA",
        Amassada => "AMASSADA",
        Reparada => "REPARADA",
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ServiceOrder {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub status: String,
    pub fuel_level: String,
    pub adblue_level: String,
    pub km: i32,
    pub tire_status: String,
    pub mirror_status: String,
    pub painting_status: String,
    pub complaints: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceOrder {
    pub fn parsed_status(&self) -> Option<OrderStatus> {
        OrderStatus::parse(&self.status)
    }

    pub fn is_finalized(&self) -> bool {
        self.parsed_status() == Some(OrderStatus::Finalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_roundtrip() {
        for status in [OrderStatus::Awaiting, OrderStatus::InProgress, OrderStatus::Finalized] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("CANCELLED"), None);
    }

    #[test]
    fn test_human_label() {
        assert_eq!(OrderStatus::InProgress.human_label(), "Em andamento");
        assert_eq!(OrderStatus::Finalized.human_label(), "Finalizado");
    }

    #[test]
    fn test_enumeraciones_de_inspeccion() {
        assert_eq!(FuelLevel::parse("TRES_QUARTOS"), Some(FuelLevel::TresQuartos));
        assert_eq!(AdblueLevel::Vazio.as_str(), "VAZIO");
        assert_eq!(TireStatus::parse("NOVO"), Some(TireStatus::Novo));
        assert_eq!(MirrorStatus::parse("ESPELHO"), None);
        assert_eq!(PaintingStatus::Intacta.as_str(), "INTACTA");
    }
}
