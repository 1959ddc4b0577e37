use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use placemark_db::store::{CatalogStore, MemoryStore, SqlStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use placemark_api::config::{ServerConfig, StoreBackend};
use placemark_api::{relay, router, state};

use state::AppState;

/// Interval between relay keep-alive pings.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "placemark_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, backend = ?config.store_backend, "Loaded server configuration");

    // --- Store ---
    let store: Arc<dyn CatalogStore> = match config.store_backend {
        StoreBackend::Memory => {
            if config.seed_demo_data {
                tracing::info!("Using in-memory store with demo catalog");
                Arc::new(MemoryStore::with_demo_places())
            } else {
                tracing::info!("Using empty in-memory store");
                Arc::new(MemoryStore::new())
            }
        }
        StoreBackend::Postgres => {
            let database_url = std::env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set when STORE_BACKEND=postgres");

            let pool = placemark_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            placemark_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            placemark_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(SqlStore::new(pool))
        }
    };

    // --- Relay hub + background tasks ---
    let hub = Arc::new(relay::RelayHub::new());
    let heartbeat_handle = hub.start_heartbeat(HEARTBEAT_INTERVAL);
    let generator_handle = relay::start_generator(Arc::clone(&store), Arc::clone(&hub));
    tracing::info!("Relay hub started (heartbeat + auto-refresh generator)");

    // --- App state & router ---
    let app_state = AppState {
        store,
        relay: Arc::clone(&hub),
    };
    let app = router::build_app_router(app_state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    generator_handle.abort();
    tracing::info!("Auto-refresh generator stopped");

    let count = hub.connection_count().await;
    tracing::info!(count, "Closing remaining relay connections");
    hub.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
