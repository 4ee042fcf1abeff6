use pdv_server::services::reconcile::reconcile_all;
use pdv_server::{AppState, Config, create_router, logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = logger::init_logger(&config);

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "Starting pdv-server"
    );

    if config.is_production() && config.cors_allow_origin.is_none() {
        tracing::warn!("CORS_ALLOW_ORIGIN not set in production, any origin is allowed");
    }

    let state = AppState::new(&config).await?;

    if config.reconcile_on_startup {
        match reconcile_all(&state.pool).await {
            Ok(corrections) => tracing::info!(corrections, "Startup reconciliation finished"),
            Err(e) => {
                let err: shared::AppError = e.into();
                tracing::error!(error = %err, "Startup reconciliation failed");
            }
        }
    }

    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("pdv-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("pdv-server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down gracefully"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }
}
