//! # plus-gate
//!
//! Checkout and paywall service for the plus subscription.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export CREEM_API_KEY=creem_test_...
//! export CREEM_PRODUCT_ID=prod_...
//! export SUPABASE_URL=https://<ref>.supabase.co
//! export SUPABASE_ANON_KEY=...
//!
//! # Run the server
//! plus-gate
//! ```

use gate_api::{routes, AppConfig, AppState, LogFormat};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
    }

    let addr = config.socket_addr()?;
    let is_prod = config.is_production();
    let state = AppState::from_env(config)?;

    info!("Environment: {}", state.config.environment);
    info!("Checkout provider: {}", state.checkout.provider_name());
    info!("Default product: {}", state.checkout.default_product_id());
    if let Some(accounts) = &state.accounts {
        info!("Account backend: {}", accounts.backend_name());
    }

    let app = routes::create_router(state);

    info!("plus-gate {} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);
    if !is_prod {
        info!("Checkout: POST http://{}/api/checkout", addr);
        info!("Entitlement: GET http://{}/api/entitlement", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
