//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod appointment;
pub mod client;
pub mod notification;
pub mod photo;
pub mod service_order;
pub mod service_report;
pub mod vehicle;
