use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    config::AppConfig,
    errors::{Error, Result},
    routes::app,
    state::AppState,
};

pub mod config;
pub mod consts;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("tracing subscriber: {e}")))?;

    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let state = AppState::init(config).await?;

    info!("Starting server");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Serving vejmankassen at http://{}", listener.local_addr()?);
    axum::serve(
        listener,
        app(state)?.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
