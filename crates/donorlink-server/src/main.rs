mod api;
mod middleware;

use std::{net::SocketAddr, sync::Arc};

use donorlink_geocode::{GeocodeSettings, GeocodingClient};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limits, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = donorlink_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = donorlink_db::connect_pool_from_config(&config).await?;
    let applied = donorlink_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let geocoder = GeocodingClient::new(GeocodeSettings::from_app_config(&config))?;

    let auth = AuthState::from_env(matches!(
        config.env,
        donorlink_core::Environment::Development
    ))?;
    let state = AppState {
        pool,
        geocoder: Arc::new(geocoder),
    };
    let app = build_app(state, auth, default_rate_limits());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
