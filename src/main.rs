mod domain;
mod clients;
mod messages;

mod app_system;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod console;
mod form;
mod manager;
mod store;
mod sync;
mod user_actor;

use clap::Parser;
use tracing::{info, Instrument};
use crate::app_system::{setup_tracing, Config, UserManagerSystem};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = Config::parse();

    // Setup tracing once for the entire application
    setup_tracing();

    info!(mode = ?config.mode, api_url = %config.api_url, "Starting user manager");

    let system = UserManagerSystem::from_config(&config);

    let span = tracing::info_span!("console");
    let result = console::run(&system.manager)
        .instrument(span)
        .await
        .map_err(|e| e.to_string());

    // Shutdown system gracefully, even when the console failed
    system.shutdown().await?;
    result?;

    info!("User manager stopped");
    Ok(())
}
