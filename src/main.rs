mod assets;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod utils;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    assets::cloudinary::CloudinaryClient, config::Config, db::postgres::PgStore,
    services::counters::ViewLimiter, state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = db::init_db(&config).await?;
    tracing::info!("✅ Conexión a Postgres exitosa");

    if config.cloudinary.cloud_name.is_none() {
        tracing::warn!("Cloudinary sin configurar: subidas y borrados de imágenes fallarán");
    }

    let store = Arc::new(PgStore::new(pool));
    let state = AppState {
        contents: store.clone(),
        comments: store.clone(),
        submissions: store,
        assets: Arc::new(CloudinaryClient::new(config.cloudinary.clone())),
        views: Arc::new(ViewLimiter::default()),
        jwt_secret: Arc::from(config.jwt_secret.as_str()),
        asset_folder: Arc::from(config.cloudinary.folder.as_str()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_routes(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Servidor corriendo en http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
