//! Clientes de servicios externos

pub mod whatsapp;
