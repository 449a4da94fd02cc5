//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación:
//! resolución de entidades, calendario de slots, workflows de
//! agendamiento y orden de servicio, y el dispatcher de notificaciones.

pub mod appointment_service;
pub mod entity_resolver;
pub mod notification_service;
pub mod order_service;
pub mod report_service;
pub mod slot_calendar;
