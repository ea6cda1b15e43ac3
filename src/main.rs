use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reeltomp3::app::create_app;
use reeltomp3::config::settings::AppConfig;
use reeltomp3::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new();
    info!("Using ffmpeg at {}", config.ffmpeg_path.display());
    if config.session_id.is_none() {
        info!("IG_SESSIONID not set, private endpoints will likely be refused");
    }

    let port = config.server_port;
    let state = AppState::new(config)?;
    let app = create_app(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
