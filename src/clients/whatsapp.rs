//! Cliente de WhatsApp (Twilio)
//!
//! Implementación del `Notifier` contra la API REST de mensajes de
//! Twilio. El número llega en formato local de 11 dígitos (DDD +
//! número); Twilio espera el formato internacional sin el 9 extra
//! después del DDD.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::utils::validation::normalize_phone;

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Entrega de un mensaje de texto a un número de teléfono
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> Result<(), NotifierError>;
}

/// Ajusta un número local de 11 dígitos al formato que espera Twilio:
/// se remueve el tercer dígito (el 9 después del DDD) y se antepone
/// el código de país.
pub fn adjust_number(raw: &str) -> Result<String, NotifierError> {
    let cleaned = normalize_phone(raw);

    if cleaned.len() != 11 {
        return Err(NotifierError::InvalidPhone(format!(
            "expected 11 digits (DDD + number), got {}",
            cleaned.len()
        )));
    }

    let adjusted = format!("{}{}", &cleaned[..2], &cleaned[3..]);
    Ok(format!("whatsapp:+55{}", adjusted))
}

pub struct WhatsAppClient {
    http_client: Client,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl WhatsAppClient {
    pub fn new(account_sid: String, auth_token: String, from: String) -> Self {
        Self {
            http_client: Client::new(),
            account_sid,
            auth_token,
            from,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }
}

#[async_trait]
impl Notifier for WhatsAppClient {
    async fn send(&self, phone: &str, message: &str) -> Result<(), NotifierError> {
        let to = adjust_number(phone)?;

        let params = [
            ("From", self.from.as_str()),
            ("To", to.as_str()),
            ("Body", message),
        ];

        let response = self
            .http_client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| NotifierError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifierError::Delivery(format!(
                "Twilio responded {}: {}",
                status, body
            )));
        }

        debug!("📲 WhatsApp entregado a {}", to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_number_remueve_el_nueve() {
        // 11 98765-4321 -> DDD 11, se cae el 9 inicial
        assert_eq!(
            adjust_number("11987654321").unwrap(),
            "whatsapp:+551187654321"
        );
    }

    #[test]
    fn test_adjust_number_acepta_formato_con_separadores() {
        assert_eq!(
            adjust_number("(11) 98765-4321").unwrap(),
            "whatsapp:+551187654321"
        );
    }

    #[test]
    fn test_adjust_number_rechaza_largo_invalido() {
        assert!(adjust_number("987654321").is_err());
        assert!(adjust_number("").is_err());
    }
}
