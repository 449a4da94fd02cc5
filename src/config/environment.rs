//! Configuración de variables de entorno

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub port: u16,
    /// URL pública de la app, usada en los links de seguimiento
    pub app_url: String,
    pub upload_dir: String,
    // Credenciales de Twilio para WhatsApp
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
}

impl EnvironmentConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            app_url: env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID")
                .map_err(|_| anyhow::anyhow!("TWILIO_ACCOUNT_SID must be set"))?,
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN")
                .map_err(|_| anyhow::anyhow!("TWILIO_AUTH_TOKEN must be set"))?,
            twilio_phone_number: env::var("TWILIO_PHONE_NUMBER")
                .map_err(|_| anyhow::anyhow!("TWILIO_PHONE_NUMBER must be set"))?,
        })
    }
}
