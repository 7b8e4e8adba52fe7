use std::net::SocketAddr;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt::time::LocalTime, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use crate::{app_state::AppState, config::read_config};

mod adapters;
mod app_state;
mod auth;
mod config;
mod domain;
mod factory;
mod repositories;
mod router;
mod routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::from_filename(".env.local").ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adventure_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTime::rfc_3339()))
        .init();

    let config = read_config()?;
    let app_url = Url::parse(&config.application.app_url)?;

    let connection_pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy_with(config.database.with_db());

    sqlx::migrate!("./migrations").run(&connection_pool).await?;

    tracing::info!(offset = %config.grid.utc_offset, "grid days start at local midnight");
    let grid_service = factory::grid_service(connection_pool.clone(), config.grid.utc_offset);
    let app_state = AppState::new(app_url, grid_service);
    let app = router::create(connection_pool, app_state).await?;

    let addr: SocketAddr = format!("{}:{}", config.application.host, config.application.port)
        .parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
