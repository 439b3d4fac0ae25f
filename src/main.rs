//! Budget Engine preview server.

use std::env;

use budget_engine::api::{AppState, create_router};
use budget_engine::config::CatalogLoader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CATALOG_DIR: &str = "./config/catalog";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,budget_engine=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let catalog_dir =
        env::var("BUDGET_ENGINE_CATALOG").unwrap_or_else(|_| DEFAULT_CATALOG_DIR.to_string());
    let addr = env::var("BUDGET_ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let catalog = match CatalogLoader::load(&catalog_dir) {
        Ok(loader) => loader.into_catalog(),
        Err(err) => {
            error!(catalog_dir = %catalog_dir, error = %err, "failed to load catalog");
            std::process::exit(1);
        }
    };

    let app = create_router(AppState::new(catalog));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(addr = %addr, error = %err, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, catalog_dir = %catalog_dir, "budget engine listening");
    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "server error");
        std::process::exit(1);
    }
}
