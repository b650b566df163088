pub mod error;
pub mod payloads;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post, put},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};

use crate::utils::error::Result;
use routes::{
    end_maintenance_handler, history_handler, park_handler, slots_handler,
    start_maintenance_handler, statistics_handler, status_handler, unpark_handler,
    welcome_handler,
};
pub use state::AppState;

pub const API_BASE_PATH: &str = "/api/parking";

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/park", post(park_handler))
        .route("/unpark", post(unpark_handler))
        .route("/status", get(status_handler))
        .route("/slots", get(slots_handler))
        .route("/maintenance/{id}", put(start_maintenance_handler))
        .route("/maintenance/end/{id}", put(end_maintenance_handler))
        .route("/statistics", get(statistics_handler))
        .route("/history", get(history_handler));

    Router::new()
        .route("/", get(welcome_handler))
        .nest(API_BASE_PATH, api)
        .layer(cors)
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let address = listener.local_addr()?;
    tracing::info!("🚀 Server listening at http://{}", address);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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
