use serde::Deserialize;
use validator::Validate;

/// Datos del reporte que finaliza la orden
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}
