mod clients;
mod config;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod storage;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use clients::whatsapp::WhatsAppClient;
use config::environment::EnvironmentConfig;
use middleware::cors::cors_middleware;
use state::AppState;
use storage::{LocalPhotoStore, MAX_PHOTOS_PER_ORDER, MAX_PHOTO_BYTES};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🔧 Oficina Backend - Agendamientos y Órdenes de Servicio");
    info!("========================================================");

    let config = EnvironmentConfig::from_env()?;

    // Inicializar base de datos
    let pool = match database::connection::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    info!("✅ Base de datos conectada exitosamente");

    // Cliente de WhatsApp (Twilio) y almacenamiento local de fotos
    let notifier = Arc::new(WhatsAppClient::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        config.twilio_phone_number.clone(),
    ));
    let photo_store = Arc::new(LocalPhotoStore::new(config.upload_dir.clone()));

    let port = config.port;
    let app_state = AppState::new(pool, config, notifier, photo_store);

    // Las rutas multipart cargan hasta 6 fotos de 5 MB más el JSON
    let body_limit = (MAX_PHOTOS_PER_ORDER as usize * MAX_PHOTO_BYTES) + 1024 * 1024;

    let app = Router::new()
        .nest(
            "/appointments",
            routes::appointment_routes::create_appointment_router(),
        )
        .nest(
            "/public/appointments",
            routes::appointment_routes::create_public_appointment_router(),
        )
        .nest("/service-orders", routes::order_routes::create_order_router())
        .nest(
            "/service-reports",
            routes::report_routes::create_report_router(),
        )
        .nest("/tracking", routes::tracking_routes::create_tracking_router())
        .nest(
            "/notifications",
            routes::notification_routes::create_notification_router(),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("📆 Agendamientos:");
    info!("   POST /appointments - Crear agendamiento (staff)");
    info!("   GET  /appointments - Listar agenda");
    info!("   GET  /appointments/available-slots - Horarios libres por fecha");
    info!("   GET  /appointments/:id - Obtener agendamiento");
    info!("   POST /appointments/:id/convert - Convertir en orden de servicio");
    info!("   POST /public/appointments - Crear agendamiento (público)");
    info!("🚗 Órdenes de servicio:");
    info!("   POST  /service-orders - Crear orden (vehículo existente)");
    info!("   POST  /service-orders/full - Crear orden completa (multipart)");
    info!("   GET   /service-orders - Listar órdenes");
    info!("   GET   /service-orders/:id - Vista de seguimiento");
    info!("   PATCH /service-orders/:id - Actualizar orden (multipart)");
    info!("📋 Reportes:");
    info!("   POST /service-reports/:order_id - Crear reporte y finalizar");
    info!("   GET  /service-reports/:order_id - Obtener reporte");
    info!("🔔 Notificaciones:");
    info!("   GET  /notifications - Listar notificaciones");
    info!("   GET  /notifications/client/:client_id - Por cliente");
    info!("🌍 Seguimiento público:");
    info!("   GET  /tracking/:order_id - Vista pública de la orden");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                anyhow::anyhow!(e)
            })
    });

    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
