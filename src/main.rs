use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use dawarich_route_editor::config::{DatabaseConfig, EnvironmentConfig};
use dawarich_route_editor::repositories::PointRepository;
use dawarich_route_editor::{create_app_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging; RUST_LOG tiene prioridad sobre DEBUG
    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("🗺️ Dawarich Route Editor");
    info!("=======================");

    // Pool perezoso: el servidor arranca aunque la base de datos no responda
    let db_config = DatabaseConfig::from_env()?;
    info!("🐘 Base de datos: {}", db_config.describe());
    let pool = db_config.create_pool()?;

    match dawarich_route_editor::database::ping(&pool).await {
        Ok(()) => info!("✅ PostgreSQL conectado"),
        Err(e) => warn!("⚠️ PostgreSQL no disponible todavía: {}", e),
    }

    let state = AppState::new(Arc::new(PointRepository::new(pool.clone())), config.clone());
    let app = create_app_router(state);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    / - Interfaz web");
    info!("   GET    /health - Health check");
    info!("   GET    /api/users - Usuarios con puntos");
    info!("   GET    /api/users/:user_id/routes?days=N - Rutas diarias");
    info!("   GET    /api/users/:user_id/routes/:route_date/points - Puntos de una ruta");
    info!("   POST   /api/users/:user_id/routes/:route_date/points - Añadir punto");
    info!("   DELETE /api/users/:user_id/points/:point_id - Borrar punto");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind {}", addr))?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    pool.close().await;
    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
