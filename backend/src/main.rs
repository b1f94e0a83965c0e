//! Backend entry-point: loads settings, prepares the database and serves the
//! API, CSV exports and printable reports.

mod server;

use actix_web::web;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use stockroom::inbound::http::health::HealthState;
use stockroom::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use stockroom::settings::Settings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load().map_err(std::io::Error::other)?;
    let database_url = settings
        .database
        .url()
        .map_err(std::io::Error::other)?
        .to_owned();
    let bind_addr = settings.server.bind_addr().map_err(std::io::Error::other)?;

    let migration_url = database_url.clone();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;
    info!(count = applied.len(), "migrations applied");

    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(settings.database.max_connections)
            .with_connection_timeout(settings.database.connect_timeout()),
    )
    .await
    .map_err(std::io::Error::other)?;

    let credentials = settings.basic_auth.credentials();
    if credentials.is_none() {
        warn!("BASIC_USER/BASIC_PASS not set; basic auth is disabled");
    }

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, pool)
        .with_upload_dir(settings.server.upload_dir)
        .with_credentials(credentials);
    let server = create_server(health_state.clone(), config)?;

    let handle = server.handle();
    let shutdown_health = health_state.clone();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested; draining connections");
        shutdown_health.mark_unhealthy();
        handle.stop(true).await;
    });

    server.await?;
    info!("server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
