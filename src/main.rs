use std::net::SocketAddr;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use mftracker::{config, db, logging, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration (embedded defaults -> mftracker.toml -> MFTRACKER_CONFIG -> env/.env)
    let app_cfg = config::load()?;

    // Keep the guards alive so the non-blocking writers flush on exit
    let _log_guards = logging::init(&app_cfg.logging)?;

    let pool = db::open(&app_cfg.database).await?;
    match db::ping(&pool, Duration::from_secs(5)).await {
        Ok(()) => info!(database = %app_cfg.database.name, "database reachable"),
        Err(e) => warn!(database = %app_cfg.database.name, error = %e, "database ping failed"),
    }
    db::init_db(&pool).await?;

    let state = AppState::new(pool, app_cfg.clone());
    let app = routes::router(state);

    // CORS: permissive in debug builds for local development only
    let app = if cfg!(debug_assertions) { app.layer(CorsLayer::permissive()) } else { app };

    let port: u16 = app_cfg.server.port;
    let host: String = app_cfg.server.host.clone();
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen addr {}:{} - {}", host, port, e))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("mftracker listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received. Stopping server...");
}
