use actix_web::HttpServer;
use anyhow::Context;
use dotenvy::dotenv;
use log::{info, warn};
use std::sync::Arc;

use sentinel_api::{create_app, AppState};
use sentinel_core::repositories::InMemoryIdentityResolver;
use sentinel_core::services::{AuthGate, RateGate, TokenValidator};
use sentinel_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Sentinel API Server");

    // Invalid configuration must stop the process before it binds
    let config = AppConfig::from_env().context("failed to load configuration")?;

    let rate_gate = Arc::new(RateGate::new(&config.rate_limit).context("invalid rate limit configuration")?);

    let resolver = match &config.auth.identity_file {
        Some(path) => InMemoryIdentityResolver::from_json_file(path)
            .await
            .context("failed to load identity directory")?,
        None => {
            warn!("IDENTITY_FILE not set; every authenticated request will be rejected");
            InMemoryIdentityResolver::new()
        }
    };
    let auth_gate = Arc::new(AuthGate::new(
        TokenValidator::new(config.auth.jwt_secret()),
        Arc::new(resolver),
    ));

    let state = AppState::new(Arc::clone(&rate_gate), auth_gate, config.auth.cookie_name.clone())
        .trust_forwarded_headers(config.rate_limit.trust_forwarded_headers);

    let sweeper = rate_gate
        .start_sweeper()
        .context("failed to start idle sweeper")?;

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()))
        .shutdown_timeout(config.server.shutdown_timeout);
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    info!("Shutting down server...");
    sweeper.shutdown().await;
    info!("Server exited properly");

    Ok(())
}
