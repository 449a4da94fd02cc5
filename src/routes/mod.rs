//! Rutas HTTP
//!
//! Capa deliberadamente delgada: cada handler decodifica el request
//! tipado y delega en el service correspondiente.

pub mod appointment_routes;
pub mod notification_routes;
pub mod order_routes;
pub mod report_routes;
pub mod tracking_routes;

use axum::extract::Multipart;
use serde::de::DeserializeOwned;

use crate::storage::UploadedFile;
use crate::utils::errors::{AppError, AppResult};

/// Decodifica un multipart con una parte `data` (JSON) opcional y
/// cero o más partes `files`.
pub(crate) async fn parse_multipart<T>(mut multipart: Multipart) -> AppResult<(T, Vec<UploadedFile>)>
where
    T: DeserializeOwned + Default,
{
    let mut data: Option<T> = None;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation("VALIDATION_ERROR", None, format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("data") => {
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::validation("VALIDATION_ERROR", Some("data"), format!("Unreadable data part: {}", e))
                })?;

                data = Some(serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::validation("VALIDATION_ERROR", Some("data"), format!("Invalid JSON in data part: {}", e))
                })?);
            }
            Some("files") => {
                let original_name = field.file_name().unwrap_or("photo").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::validation("VALIDATION_ERROR", Some("files"), format!("Unreadable file part: {}", e))
                })?;

                files.push(UploadedFile { original_name, bytes: bytes.to_vec() });
            }
            _ => {}
        }
    }

    Ok((data.unwrap_or_default(), files))
}
