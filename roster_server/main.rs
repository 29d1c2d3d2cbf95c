use std::sync::Arc;

use roster_app::{app_bus::AppBus, config::Config, images::ImageStore};
use roster_db::{
    FsImageStore, establish_connection_pool, run_migrations, uow::PostgresUnitOfWorkProvider,
};
use roster_types::{Result, errors::ApplicationError};
use roster_web::{AppState, WebRouter};

mod logs;
use logs::setup_logging;

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> Result<(), ApplicationError> {
    setup_logging();
    let state = setup_app().await?;

    WebRouter::serve(state).await
}

async fn setup_app() -> Result<AppState, ApplicationError> {
    let config = Arc::new(Config::from_env());
    tracing::info!(
        "Starting roster in {:?} mode, uploads in {}",
        config.environment,
        config.upload_dir.display()
    );

    let db_pool = establish_connection_pool().await?;

    run_migrations(&db_pool)
        .await
        .map_err(|e| ApplicationError::Unknown(e.to_string()))?;

    let images: Arc<dyn ImageStore> = Arc::new(FsImageStore::open(&config.upload_dir).await?);
    let uow_provider = Arc::new(PostgresUnitOfWorkProvider::new(db_pool));
    let app_bus = Arc::new(AppBus::new(config.clone(), uow_provider));

    Ok(AppState::new(app_bus, images))
}
