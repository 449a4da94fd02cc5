//! Acceso a datos
//!
//! Funciones de query por entidad. Todas reciben `&mut PgConnection`
//! para poder ejecutarse dentro de la transacción del caller; los
//! services deciden el límite transaccional.

pub mod appointment_repository;
pub mod client_repository;
pub mod notification_repository;
pub mod order_repository;
pub mod photo_repository;
pub mod report_repository;
pub mod vehicle_repository;
