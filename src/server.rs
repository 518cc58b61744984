use anyhow::Result;
use tower_http::trace::TraceLayer;

use crate::auth::AuthSettings;
use crate::config::Config;
use crate::routes::{AppState, cors_layer, router};

pub async fn serve(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!(environment = config.environment.as_str(), "Starting car-doctor server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    let pool =
        crate::db::create_pool(&config.database.url, config.database.max_connections).await?;
    car_doctor_db::migrate(&pool).await?;

    let auth = AuthSettings::from_config(&config);
    tracing::warn!(
        require_email = auth.require_email,
        "POST /jwt signs any presented identity without checking credentials"
    );

    let app = router(AppState::new(auth, pool.clone()))
        .layer(cors_layer(&config.cors)?)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Closing database pool...");
    pool.close().await;
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}
