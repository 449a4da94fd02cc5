//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas. Cada error lleva
//! un código estable legible por máquina y, cuando aplica, el campo
//! ofensivo.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{message}")]
    Validation {
        code: &'static str,
        field: Option<&'static str>,
        message: String,
    },

    #[error("{message}")]
    NotFound {
        code: &'static str,
        field: Option<&'static str>,
        message: String,
    },

    #[error("{message}")]
    Conflict {
        code: &'static str,
        field: Option<&'static str>,
        message: String,
    },

    #[error("{message}")]
    PreconditionFailed {
        code: &'static str,
        field: Option<&'static str>,
        message: String,
    },

    #[error("{message}")]
    InvalidRelation {
        field: &'static str,
        message: String,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(code: &'static str, field: Option<&'static str>, message: impl Into<String>) -> Self {
        Self::Validation { code, field, message: message.into() }
    }

    pub fn not_found(code: &'static str, field: Option<&'static str>, message: impl Into<String>) -> Self {
        Self::NotFound { code, field, message: message.into() }
    }

    pub fn conflict(code: &'static str, field: Option<&'static str>, message: impl Into<String>) -> Self {
        Self::Conflict { code, field, message: message.into() }
    }

    pub fn precondition(code: &'static str, field: Option<&'static str>, message: impl Into<String>) -> Self {
        Self::PreconditionFailed { code, field, message: message.into() }
    }

    pub fn invalid_relation(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRelation { field, message: message.into() }
    }

    /// Código estable del error
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation { code, .. } => code,
            AppError::NotFound { code, .. } => code,
            AppError::Conflict { code, .. } => code,
            AppError::PreconditionFailed { code, .. } => code,
            AppError::InvalidRelation { .. } => "INVALID_RELATION",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation {
            code: "VALIDATION_ERROR",
            field: None,
            message: errors.to_string(),
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code().to_string();

        let (status, error, message, field) = match self {
            AppError::Database(e) => {
                // El detalle interno del store no se expone al caller
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    None,
                )
            }

            AppError::Validation { field, message, .. } => {
                (StatusCode::BAD_REQUEST, "Validation Error", message, field)
            }

            AppError::NotFound { field, message, .. } => {
                (StatusCode::NOT_FOUND, "Not Found", message, field)
            }

            AppError::Conflict { field, message, .. } => {
                (StatusCode::CONFLICT, "Conflict", message, field)
            }

            AppError::PreconditionFailed { field, message, .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Precondition Failed", message, field)
            }

            AppError::InvalidRelation { field, message } => {
                (StatusCode::BAD_REQUEST, "Invalid Relation", message, Some(field))
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
            code,
            field: field.map(str::to_string),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Detecta violaciones de constraint UNIQUE de PostgreSQL
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err.as_database_error() {
        Some(db) => db.constraint() == Some(constraint),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codigo_estable_por_variante() {
        let err = AppError::conflict("TIME_SLOT_OCCUPIED", None, "Slot occupied");
        assert_eq!(err.code(), "TIME_SLOT_OCCUPIED");

        let err = AppError::invalid_relation("vehicle_id", "Vehicle belongs to another client");
        assert_eq!(err.code(), "INVALID_RELATION");

        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_field_opcional_en_conflicto() {
        let err = AppError::conflict("DUPLICATE_FIELD", Some("email"), "Email already registered");
        match err {
            AppError::Conflict { field, .. } => assert_eq!(field, Some("email")),
            _ => panic!("variante incorrecta"),
        }
    }
}
