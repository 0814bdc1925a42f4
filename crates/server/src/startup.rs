use std::{net::SocketAddr, time::Duration};

use axum::Router;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tracing::{info, warn};

use common::utils::logging::init_logging;
use configs::AppConfig;

use crate::errors::StartupError;
use crate::routes;
use crate::scheduler;
use crate::state::ServerState;

const DATA_DIR: &str = "data";

/// `config.toml` when present and valid, otherwise environment variables.
fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(file_err) => {
            let cfg = AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            warn!(error = %file_err, "config.toml not usable, using environment");
            Ok(cfg)
        }
    }
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Connect with the given pool settings and bring the schema up to date.
pub async fn prepare_database(cfg: &models::db::DatabaseConfig) -> Result<DatabaseConnection, StartupError> {
    let db = models::db::connect_with_config(cfg)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(format!("migration failed: {e}")))?;
    info!("database migrations applied");
    Ok(db)
}

pub fn app(db: DatabaseConnection) -> Router {
    routes::build_router(ServerState { db })
}

/// Serve `app` on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), StartupError> {
    axum::serve(listener, app).await.map_err(|e| StartupError::Any(e.into()))
}

/// Public entry: load config, prepare the database, start the scheduler and serve HTTP.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    let cfg = load_config()?;
    init_logging(&cfg.logging.format);

    if cfg.database.is_sqlite() {
        common::env::ensure_data_dir(DATA_DIR).await.map_err(StartupError::Any)?;
    }
    let db = prepare_database(&(&cfg.database).into()).await?;

    if cfg.scheduler.enabled {
        scheduler::spawn(db.clone(), Duration::from_secs(cfg.scheduler.interval_secs));
    } else {
        info!("maintenance scheduler disabled");
    }

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await.map_err(|e| StartupError::Any(e.into()))?;
    info!(%addr, "cmms server listening");
    serve(listener, app(db)).await
}
