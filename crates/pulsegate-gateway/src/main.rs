//! pulsegate gateway binary.
//!
//! - Config: defaults, optional YAML (`PULSEGATE_CONFIG`), then `.env` + environment
//! - Record store connected once and injected into every handler
//! - Graceful shutdown on Ctrl+C / SIGTERM, store released afterwards

use pulsegate_core::error::{GatewayError, Result};
use pulsegate_gateway::{app_state::AppState, config, obs, router, store};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load()?;
    obs::logging::init(cfg.gateway.log_format);

    let store = store::connect(&cfg.store).await;
    let listen = cfg.listen_addr();

    let state = AppState::new(cfg, store)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, backend = state.store().backend(), "pulsegate starting");
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .map_err(|e| GatewayError::Config(format!("bind {listen} failed: {e}")))?;

    let drain = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            drain.set_draining();
        })
        .await
        .map_err(|e| GatewayError::Internal(format!("server failed: {e}")))?;

    state.store().close().await;
    tracing::info!("pulsegate stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, starting graceful shutdown");
}
