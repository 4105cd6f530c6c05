use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use configs::{AppConfig, ImportConfig};
use migration::{Migrator, MigratorTrait};
use service::importer;
use service::swift_code::repo::seaorm::SeaOrmSwiftCodeRepository;
use service::swift_code::repository::SwiftCodeRepository;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::errors::StartupError;
use crate::routes::{self, DynSwiftCodeService, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn parse_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.server.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Load the configured file into the store before serving.
///
/// A missing file is skipped. Other failures are logged and tolerated unless
/// `fail_on_error` is set.
pub async fn run_import(cfg: &ImportConfig, svc: &DynSwiftCodeService) -> Result<(), StartupError> {
    if !cfg.enabled {
        info!("startup import disabled");
        return Ok(());
    }
    if !Path::new(&cfg.file_path).exists() {
        warn!(path = %cfg.file_path, "import file not found, skipping startup import");
        return Ok(());
    }

    match importer::import_file(&cfg.file_path, &cfg.sheet, svc).await {
        Ok(summary) => {
            info!(path = %cfg.file_path, imported = summary.imported, skipped = summary.skipped, "startup import done");
            Ok(())
        }
        Err(e) if cfg.fail_on_error => Err(e.into()),
        Err(e) => {
            error!(path = %cfg.file_path, err = %e, "startup import failed, serving existing data");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(err = %e, "failed to listen for ctrl_c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(err = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

/// Public entry: connect, migrate, import, then serve until a shutdown signal.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None)
        .await
        .map_err(|e| anyhow::anyhow!("running migrations: {e}"))?;
    info!("migrations applied");

    let repo: Arc<dyn SwiftCodeRepository> = Arc::new(SeaOrmSwiftCodeRepository::new(db.clone()));
    let state = ServerState::new(repo);
    run_import(&cfg.import, &state.swift_codes).await?;

    let app: Router = routes::build_router(state, build_cors());

    let addr = parse_bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("binding {addr}: {e}"))?;
    info!(%addr, "starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("serving http: {e}"))?;

    if let Err(e) = db.close().await {
        warn!(err = %e, "closing database pool");
    }
    info!("server stopped");
    Ok(())
}
