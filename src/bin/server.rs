//! ADX HTTP Server Binary
//!
//! Entry point for the Autoscheduler Data Explorer REST API. Initializes
//! the repository, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin adx-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `ADX_HOST`: Server host (default: 127.0.0.1)
//! - `ADX_PORT`: Server port (default: 8080)
//! - `ADX_CACHE_DIR`: Source-file cache directory
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use adx_rust::config::AppConfig;
use adx_rust::db;
use adx_rust::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting ADX HTTP Server");

    let config = AppConfig::load()?;

    db::init_repository()?;
    let repository = db::get_repository()?;
    info!("Repository initialized successfully");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(repository, config);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
