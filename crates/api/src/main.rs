use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use khm_api::background::snapshot_retention;
use khm_api::broadcast::{BroadcastLoop, SnapshotRecorder, SubscriberRegistry};
use khm_api::config::ServerConfig;
use khm_api::router::build_app_router;
use khm_api::sessions::SessionFlags;
use khm_api::state::AppState;
use khm_collector::MetricsCollector;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // LOG_FORMAT=json switches to one JSON object per line.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "khm_api=debug,khm_collector=info,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        interval_secs = config.monitor.interval.as_secs(),
        "Loaded server configuration"
    );

    // --- Database ---
    let pool = khm_db::create_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    tracing::info!("Database connection pool created");

    khm_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    khm_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // --- Broadcast pipeline ---
    let registry = Arc::new(SubscriberRegistry::new());
    let sessions = SessionFlags::new();

    // NVML and sensor discovery block; keep them off the async workers.
    let collector = tokio::task::spawn_blocking(MetricsCollector::new)
        .await
        .expect("Metrics collector initialisation panicked");
    let loop_handle =
        BroadcastLoop::new(collector, Arc::clone(&registry), config.monitor.interval).spawn();

    // --- Background jobs ---
    let cancel = CancellationToken::new();

    let recorder = SnapshotRecorder::new(
        pool.clone(),
        sessions.clone(),
        config.monitor.snapshot_interval,
    );
    let recorder_handle = tokio::spawn(recorder.run(
        Arc::clone(&registry),
        config.monitor.subscriber_buffer,
        cancel.clone(),
    ));

    let retention_handle = tokio::spawn(snapshot_retention::run(
        pool.clone(),
        config.monitor.snapshot_retention_hours,
        cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        registry: Arc::clone(&registry),
        sessions,
    };

    let app = build_app_router(state);

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
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    cancel.cancel();
    let _ = tokio::time::timeout(grace, recorder_handle).await;
    let _ = tokio::time::timeout(grace, retention_handle).await;
    tracing::info!("Background jobs stopped");

    loop_handle.abort();
    tracing::info!("Broadcast loop stopped");

    registry.clear().await;
    pool.close().await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
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
