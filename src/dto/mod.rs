//! Requests tipados y vistas de la API
//!
//! Structs de entrada explícitos con validación declarativa
//! (`validator`), más las vistas compuestas de solo lectura.

pub mod appointment_dto;
pub mod order_dto;
pub mod report_dto;
