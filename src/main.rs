use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use intersul_backoffice::config::{DatabaseConfig, EnvironmentConfig, StorageBackend};
use intersul_backoffice::repositories::{MemoryStore, PgStore, Store};
use intersul_backoffice::{create_router, database, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG, por defecto info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🖨️ InterSul cópias - API Back-office");
    info!("====================================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️ Entorno: {}", config.environment);

    let store: Arc<dyn Store> = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = match database::connect(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            info!("✅ PostgreSQL listo");
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            warn!("⚠️ Usando store en memoria: los datos se pierden al reiniciar");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, config.clone());

    if let Some(admin) = &config.admin {
        if state.accounts().bootstrap_superuser(admin).await? {
            info!("👑 Superusuario inicial '{}' disponible", admin.username);
        } else {
            info!("👑 Superusuario '{}' ya existe", admin.username);
        }
    }

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en {}", config.server_url());
    info!("🔍 Endpoints públicos:");
    info!("   POST /login/ - Login (access + refresh)");
    info!("   POST /refresh-token/ - Renovar access token");
    info!("   POST /register/usuario/ - Crear cuenta vinculada");
    info!("   POST /registrar/localizacao/ - Registrar endereço de una persona");
    info!("   GET  /site/ - Configuración del panel");
    info!("🔐 Endpoints protegidos (GET/POST, GET/PUT/PATCH/DELETE /:id/):");
    info!("   /clientes/ /funcionarios/");
    info!("   /marcas/ /funcionalidades/ /copiadoras/");
    info!("   /franquias/ /copiadora-clientes/");
    info!("📍 Datos de referencia:");
    info!("   GET /ufs/ /cidades/ /bairros/ /enderecos/ - DELETE /enderecos/:id/");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

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
