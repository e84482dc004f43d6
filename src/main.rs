use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use crate::config::Config;
use crate::controller::AppState;

pub mod config;
pub mod controller;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod table;
pub mod uploads;
pub mod views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    info!(
        "Starting admin dashboard ({}) against backend {}",
        config.environment, config.api_base_url
    );

    if config.is_production() && !config.secure_cookies {
        warn!("Running in production without secure cookies; the session token may travel over plain http");
    }

    let app_state = AppState::new(config)?;
    controller::serve(app_state).await
}
