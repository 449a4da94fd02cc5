//! Dispatcher de notificaciones
//!
//! La fila se registra con `sent = false` dentro de la transacción de
//! negocio (si esa transacción aborta, la fila se va con ella). La
//! entrega corre recién después del commit, como tarea asíncrona con
//! reintentos; un fallo de entrega se loguea y se traga, nunca falla
//! la operación de negocio que la disparó.

use sqlx::{PgConnection, PgPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clients::whatsapp::Notifier;
use crate::models::notification::Notification;
use crate::repositories::notification_repository;
use crate::utils::errors::AppResult;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);

/// Notificación registrada, pendiente de entrega post-commit
#[derive(Debug, Clone)]
pub struct PendingNotification {
    pub id: Uuid,
    pub phone: String,
    pub message: String,
}

#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
    notifier: Arc<dyn Notifier>,
}

impl NotificationService {
    pub fn new(pool: PgPool, notifier: Arc<dyn Notifier>) -> Self {
        Self { pool, notifier }
    }

    /// Registrar la fila dentro de la transacción del caller
    pub async fn record(
        &self,
        conn: &mut PgConnection,
        client_id: Uuid,
        order_id: Option<Uuid>,
        phone: &str,
        message: &str,
    ) -> AppResult<PendingNotification> {
        let notification = notification_repository::insert(conn, client_id, order_id, message).await?;

        Ok(PendingNotification {
            id: notification.id,
            phone: phone.to_string(),
            message: message.to_string(),
        })
    }

    /// Disparar la entrega. Llamar solo con la transacción ya commiteada.
    pub fn dispatch(&self, pending: PendingNotification) {
        let pool = self.pool.clone();
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            let delivered =
                deliver_with_retry(notifier.as_ref(), &pending.phone, &pending.message, RETRY_BASE_DELAY)
                    .await;

            if !delivered {
                return;
            }

            info!("📲 Notificación {} entregada", pending.id);

            if let Err(e) = notification_repository::mark_sent(&pool, pending.id).await {
                warn!("Error marcando notificación {} como enviada: {}", pending.id, e);
            }
        });
    }

    pub async fn find_all(&self, conn: &mut PgConnection) -> AppResult<Vec<Notification>> {
        notification_repository::find_all(conn).await
    }

    pub async fn find_by_client(
        &self,
        conn: &mut PgConnection,
        client_id: Uuid,
    ) -> AppResult<Vec<Notification>> {
        notification_repository::find_by_client(conn, client_id).await
    }
}

/// Intentos de entrega con backoff exponencial. Devuelve si alguno
/// confirmó la entrega.
async fn deliver_with_retry(
    notifier: &dyn Notifier,
    phone: &str,
    message: &str,
    base_delay: Duration,
) -> bool {
    let mut delay = base_delay;

    for attempt in 1..=MAX_ATTEMPTS {
        match notifier.send(phone, message).await {
            Ok(()) => return true,
            Err(e) => {
                warn!("❌ Fallo de entrega (intento {}/{}): {}", attempt, MAX_ATTEMPTS, e);

                if attempt < MAX_ATTEMPTS {
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::whatsapp::NotifierError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Notifier que falla las primeras `failures` entregas
    struct FlakyNotifier {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyNotifier {
        fn new(failures: u32) -> Self {
            Self { failures, calls: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl Notifier for FlakyNotifier {
        async fn send(&self, _phone: &str, _message: &str) -> Result<(), NotifierError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(NotifierError::Delivery("transient".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_entrega_al_primer_intento() {
        let notifier = FlakyNotifier::new(0);
        let delivered =
            deliver_with_retry(&notifier, "11987654321", "hola", Duration::from_millis(1)).await;

        assert!(delivered);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reintenta_fallos_transitorios() {
        let notifier = FlakyNotifier::new(2);
        let delivered =
            deliver_with_retry(&notifier, "11987654321", "hola", Duration::from_millis(1)).await;

        assert!(delivered);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_se_rinde_despues_del_maximo() {
        let notifier = FlakyNotifier::new(10);
        let delivered =
            deliver_with_retry(&notifier, "11987654321", "hola", Duration::from_millis(1)).await;

        assert!(!delivered);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }
}
