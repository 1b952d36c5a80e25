mod image;

use axum::{
    Router,
    routing::{get, post},
};
use catgen::prelude::*;
use clap::Parser;
use std::time::Duration;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug, Clone)]
#[command(name = "catgen-web")]
#[command(about = "Random cat image generator HTTP API", long_about = None)]
pub struct ServerConfig {
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
    pub bind: String,

    #[arg(long, env = "CAT_API_KEY", hide_env_values = true, help = "Upstream API key")]
    pub cat_api_key: Option<String>,

    #[arg(long, env = "CAT_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub cat_api_base_url: String,

    #[arg(long, env = "CAT_API_TIMEOUT_SECS", help = "Upstream request timeout in seconds")]
    pub upstream_timeout_secs: Option<u64>,
}

impl ServerConfig {
    pub fn cat_api(&self) -> Result<CatApi, CatApiError> {
        let api = CatApi::new(self.cat_api_key.clone()).with_base_url(&self.cat_api_base_url);

        match self.upstream_timeout_secs {
            Some(secs) => api.with_timeout(Duration::from_secs(secs)),
            None => Ok(api),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub api: CatApi,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/cat-images", get(image::get_images))
        .route(
            "/api/cat-images/generate",
            post(image::generate_image).fallback(image::generate_segment_as_id),
        )
        .route(
            "/api/cat-images/{id}",
            get(image::get_image)
                .patch(image::patch_image)
                .delete(image::delete_image),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();
    if config.cat_api_key.is_none() {
        warn!("CAT_API_KEY is not set; image generation will fail");
    }

    let state = AppState {
        store: Store::new(),
        api: config.cat_api()?,
    };
    info!(upstream = state.api.base_url(), "initialized state");

    let listener = TcpListener::bind(&config.bind).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {e}");
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
}
