//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::clients::whatsapp::Notifier;
use crate::config::environment::EnvironmentConfig;
use crate::services::appointment_service::AppointmentService;
use crate::services::notification_service::NotificationService;
use crate::services::order_service::OrderService;
use crate::services::report_service::ReportService;
use crate::storage::PhotoStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub notifier: Arc<dyn Notifier>,
    pub photo_store: Arc<dyn PhotoStore>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: EnvironmentConfig,
        notifier: Arc<dyn Notifier>,
        photo_store: Arc<dyn PhotoStore>,
    ) -> Self {
        Self { pool, config, notifier, photo_store }
    }

    pub fn notification_service(&self) -> NotificationService {
        NotificationService::new(self.pool.clone(), self.notifier.clone())
    }

    pub fn appointment_service(&self) -> AppointmentService {
        AppointmentService::new(self.pool.clone(), self.notification_service())
    }

    pub fn order_service(&self) -> OrderService {
        OrderService::new(
            self.pool.clone(),
            self.notification_service(),
            self.photo_store.clone(),
            self.config.app_url.clone(),
        )
    }

    pub fn report_service(&self) -> ReportService {
        ReportService::new(
            self.pool.clone(),
            self.notification_service(),
            self.photo_store.clone(),
            self.config.app_url.clone(),
        )
    }
}
