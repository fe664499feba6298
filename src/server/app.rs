// axum application setup and server startup

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::{
    cache::DirectoryCache,
    handlers::{browse::handle_get, upload::handle_post},
};
use crate::config::AppConfig;
use crate::utils::net::local_ip;

/// shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub listing_cache: Arc<DirectoryCache>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let listing_cache = DirectoryCache::primed(&config.listing, &config.server.public_dir);
        Self {
            config: Arc::new(config),
            listing_cache: Arc::new(listing_cache),
        }
    }
}

/// create the axum application; every path goes through the same
/// file / folder / not-found dispatch
pub fn create_app(config: AppConfig) -> Router {
    let body_limit = match config.upload.max_request_size {
        Some(limit) => DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX)),
        None => DefaultBodyLimit::disable(),
    };
    let app_state = AppState::new(config);

    Router::new()
        .route("/", get(handle_get).post(handle_post))
        .route("/*path", get(handle_get).post(handle_post))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// start the http server
pub async fn start_server(config: AppConfig) -> Result<()> {
    let app = create_app(config.clone());

    // create socket address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid host/port combination")?;

    // log startup information
    info!("starting dirserve v{} at http://{}", env!("CARGO_PKG_VERSION"), addr);
    info!(
        "lan url: http://{}:{} or http://localhost:{}",
        local_ip(),
        config.server.port,
        config.server.port
    );
    info!("public dir: {}", config.server.public_dir.display());
    info!(
        "{} items per page, default view: {}",
        config.listing.items_per_page,
        config.listing.view_mode.as_str()
    );

    if config.server.enable_upload {
        warn!("uploads are enabled and unauthenticated");
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("failed to bind to address")?;

    info!("server listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
