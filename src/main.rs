mod board;
mod config;
mod database;
mod error;
mod models;
mod protocol;
mod render;
mod search;
mod uploads;
mod utils;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use tracing::info;

use crate::{config::BoardConfig, database::CommentStore, uploads::UploadStore};

/// Shared by every worker; the store serializes its own writers.
pub struct AppState {
    pub config: BoardConfig,
    pub store: CommentStore,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(config: BoardConfig) -> anyhow::Result<Self> {
        let store = CommentStore::new(config.data_file.clone());
        store
            .ensure_exists()
            .context("initializing comment store")?;

        let uploads = UploadStore::new(config.upload_dir.clone(), config.max_upload_bytes);
        uploads
            .ensure_dir()
            .context("initializing upload directory")?;

        Ok(Self {
            config,
            store,
            uploads,
        })
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_layer)
        .try_init();

    let config = BoardConfig::from_env()?;
    let bind = config.bind.clone();
    let state = web::Data::new(AppState::new(config)?);
    info!(
        bind = %bind,
        data_file = %state.store.path().display(),
        upload_dir = %state.uploads.dir().display(),
        "starting {}",
        state.config.app_name
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(board::config)
    })
    .bind(&bind)
    .with_context(|| format!("binding {}", bind))?
    .run()
    .await?;

    Ok(())
}
