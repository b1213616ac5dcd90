use anyhow::Result;
use oil_union_api::config::Settings;
use oil_union_api::database::DbPool;
use oil_union_api::routes::build_router;
use oil_union_api::state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings);

    info!(
        "Starting oil-union-api v{} ({})",
        env!("CARGO_PKG_VERSION"),
        settings.server.environment
    );

    let db_pool = DbPool::new(&settings.database).await?;
    db_pool.migrate().await?;
    info!("Database connected, migrations applied");

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let state = AppState::new(settings, db_pool.clone());
    spawn_audit_pruner(&state);
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    db_pool.close().await;
    info!("Shutdown complete");
    Ok(())
}

/// Daily sweep dropping audit entries past the retention window.
fn spawn_audit_pruner(state: &AppState) {
    let audit = state.audit_service.clone();
    let retention_days = state.settings.audit.retention_days;

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(24 * 60 * 60));
        loop {
            ticker.tick().await;
            let cutoff = chrono::Utc::now() - chrono::Duration::days(retention_days);
            match audit.prune_older_than(cutoff).await {
                Ok(pruned) if pruned > 0 => info!("Pruned {} expired audit entries", pruned),
                Ok(_) => {}
                Err(err) => tracing::error!("Audit prune failed: {}", err),
            }
        }
    });
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oil_union_api=debug,tower_http=info"));

    if settings.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
