//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores,
//! validación y normalización de identificadores.

pub mod errors;
pub mod validation;
